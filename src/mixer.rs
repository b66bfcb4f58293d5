use crate::{MixError, Mixed, Provider};
#[cfg(feature = "tracing")]
use tracing::info;

/// Ordered collection of providers, mixed into a [Mixed] composite by [Mixer::make].
///
/// Mixers are immutable: [Mixer::with] returns a new mixer and leaves the original untouched.
#[derive(Clone, Debug, Default)]
pub struct Mixer {
    providers: Vec<Provider>,
}

impl Mixer {
    pub fn new(providers: impl IntoIterator<Item = Provider>) -> Self {
        Self {
            providers: providers.into_iter().collect(),
        }
    }

    /// Append providers, returning a new mixer.
    ///
    /// When several providers share a name, the last one overrides the others.
    pub fn with(&self, providers: impl IntoIterator<Item = Provider>) -> Self {
        let mut all = self.providers.clone();
        all.extend(providers);
        Self { providers: all }
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Construct all components into a new composite instance.
    ///
    /// Every factory of an authoritative provider is called exactly once. Nothing is shared
    /// between two calls: each one builds a fresh set of instances.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while constructing a component: [MixError::Cycle] when a
    /// component is used during its own construction, or the error of a failing factory.
    /// The partially built composite is discarded.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self)))]
    pub fn make(&self) -> Result<Mixed, MixError> {
        let mixed = Mixed::build(&self.providers)?;
        #[cfg(feature = "tracing")]
        info!(
            providers = self.providers.len(),
            components = mixed.len(),
            "components mixed"
        );
        Ok(mixed)
    }
}

impl FromIterator<Provider> for Mixer {
    fn from_iter<I: IntoIterator<Item = Provider>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Create a mixer over a list of providers.
pub fn mixer(providers: impl IntoIterator<Item = Provider>) -> Mixer {
    Mixer::new(providers)
}

/// Create a mixer from a comma-separated list of providers.
///
/// ```
/// # use mixdi::*;
/// let one = Provider::new("one", |_| 1u32);
/// let two = Provider::new("two", |_| 2u32);
/// let mixer = mix![one, two];
/// assert_eq!(mixer.len(), 2);
/// ```
#[macro_export]
macro_rules! mix {
    ($($provider: expr),* $(,)?) => {
        $crate::Mixer::new([$($provider),*])
    };
}
