//! Lazy resolution of the components of a single build.
//!
//! Each build owns a [Context]: one [Slot] per authoritative provider, keyed by component name.
//! A slot goes through three states:
//!
//! * [SlotState::Pending]: the factory has not been called yet. Resolving the slot calls it.
//! * [SlotState::InProgress]: the factory is running. Resolving the slot again at this point
//!   means the component is used during its own construction, which fails with [MixError::Cycle].
//! * [SlotState::Resolved]: the instance is cached and returned as is.
//!
//! The slot map itself never changes once the context is created, only the per-slot cell and
//! reentrancy flag do.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::OnceCell;
use thiserror::Error;
#[cfg(feature = "tracing")]
use tracing::{debug, error, trace};

use crate::{Instance, Mixed, Provider};

/// Boxed error raised by a user factory
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors triggered while mixing providers or reading the composite
#[derive(Error, Debug)]
pub enum MixError {
    #[error("Cyclic construction: component '{name}' was used during its own construction")]
    Cycle { name: String },
    #[error("Missing component: no provider is named '{name}'")]
    Missing { name: String },
    #[error("Type mismatch: component '{name}' holds {actual}, not {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("Abandoned composite: the build owning this handle has failed")]
    Abandoned,
    #[error("{0}")]
    Factory(#[source] BoxError),
}

impl MixError {
    /// Wrap an error raised inside a factory.
    pub fn factory(err: impl Into<BoxError>) -> Self {
        MixError::Factory(err.into())
    }

    /// The original error of a factory failure
    pub fn factory_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            MixError::Factory(err) => Some(&**err),
            _ => None,
        }
    }
}

pub type MixResult<T> = Result<T, MixError>;

#[derive(Debug)]
pub(crate) enum SlotState {
    Pending,
    InProgress,
    Resolved(Instance),
}

impl SlotState {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            SlotState::Pending => "pending",
            SlotState::InProgress => "in progress",
            SlotState::Resolved(_) => "resolved",
        }
    }
}

pub(crate) struct Slot {
    provider: Provider,
    value: OnceCell<Instance>,
    building: AtomicBool,
}

impl Slot {
    fn new(provider: Provider) -> Self {
        Self {
            provider,
            value: OnceCell::new(),
            building: AtomicBool::new(false),
        }
    }

    pub(crate) fn state(&self) -> SlotState {
        if let Some(instance) = self.value.get() {
            SlotState::Resolved(instance.clone())
        } else if self.building.load(Ordering::Acquire) {
            SlotState::InProgress
        } else {
            SlotState::Pending
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.provider.type_name()
    }

    fn cycle(&self) -> MixError {
        #[cfg(feature = "tracing")]
        error!(
            component = self.provider.name(),
            "component used during its own construction"
        );
        MixError::Cycle {
            name: self.provider.name().to_owned(),
        }
    }

    /// Call the factory and cache its result, guarding against reentrant calls
    fn build(&self, deps: &Mixed, abandoned: &AtomicBool) -> Result<Instance, MixError> {
        if self
            .building
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(self.cycle());
        }
        let _guard = BuildGuard {
            building: &self.building,
            abandoned,
        };

        // Resolved between the state check and taking the flag
        if let Some(instance) = self.value.get() {
            return Ok(instance.clone());
        }

        #[cfg(feature = "tracing")]
        debug!(
            component = self.provider.name(),
            instance_type = self.provider.type_name(),
            kind = ?self.provider.kind(),
            "constructing component"
        );

        let result = self
            .provider
            .invoke(deps)
            .map(|instance| self.value.get_or_init(|| instance).clone());

        #[cfg(feature = "tracing")]
        if result.is_ok() {
            debug!(component = self.provider.name(), "component constructed");
        }

        result
    }
}

/// Release the reentrancy flag of a slot, abandoning the build if its factory panicked
struct BuildGuard<'a> {
    building: &'a AtomicBool,
    abandoned: &'a AtomicBool,
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.abandoned.store(true, Ordering::Release);
        }
        self.building.store(false, Ordering::Release);
    }
}

/// Resolution state of a single build
pub(crate) struct Context {
    order: Vec<Arc<str>>,
    slots: HashMap<Arc<str>, Slot>,
    abandoned: AtomicBool,
    failure: Mutex<Option<MixError>>,
}

impl Context {
    /// Install one slot per authoritative provider.
    ///
    /// The last provider carrying a name wins, earlier ones are never invoked.
    /// Slots are kept in the relative order of their winning providers.
    pub(crate) fn new(providers: &[Provider]) -> Self {
        let mut last: HashMap<&str, usize> = HashMap::with_capacity(providers.len());
        for (idx, provider) in providers.iter().enumerate() {
            let _previous = last.insert(provider.name(), idx);
            #[cfg(feature = "tracing")]
            if let Some(previous) = _previous {
                debug!(
                    component = provider.name(),
                    overridden = previous,
                    by = idx,
                    "provider overridden"
                );
            }
        }

        let mut order = Vec::with_capacity(last.len());
        let mut slots = HashMap::with_capacity(last.len());
        for (idx, provider) in providers.iter().enumerate() {
            if last.get(provider.name()) == Some(&idx) {
                let name = provider.shared_name().clone();
                order.push(name.clone());
                slots.insert(name, Slot::new(provider.clone()));
            }
        }

        Self {
            order,
            slots,
            abandoned: AtomicBool::new(false),
            failure: Mutex::new(None),
        }
    }

    pub(crate) fn names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.order.iter().map(|name| &**name)
    }

    pub(crate) fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.get(name)
    }

    pub(crate) fn is_abandoned(&self) -> bool {
        self.abandoned.load(Ordering::Acquire)
    }

    /// Obtain the instance of a component, constructing it if needed.
    pub(crate) fn resolve(&self, deps: &Mixed, name: &str) -> Result<Instance, MixError> {
        if self.is_abandoned() {
            return Err(MixError::Abandoned);
        }
        let Some(slot) = self.slots.get(name) else {
            return Err(MixError::Missing {
                name: name.to_owned(),
            });
        };
        match slot.state() {
            SlotState::Resolved(instance) => {
                #[cfg(feature = "tracing")]
                trace!(component = name, "component already resolved");
                Ok(instance)
            }
            SlotState::InProgress => Err(self.fail(slot.cycle())),
            SlotState::Pending => slot
                .build(deps, &self.abandoned)
                .map_err(|err| self.fail(err)),
        }
    }

    /// Abandon the build, keeping the first failure for [Context::resolve_all].
    ///
    /// The caller gets a stand-in error: the cycle itself, or [MixError::Abandoned] for any other
    /// failure. Factories discarding it cannot resume the build, every later read is rejected.
    fn fail(&self, err: MixError) -> MixError {
        let reported = match &err {
            MixError::Cycle { name } => MixError::Cycle { name: name.clone() },
            _ => MixError::Abandoned,
        };
        self.abandoned.store(true, Ordering::Release);
        let mut failure = self.failure.lock().unwrap_or_else(PoisonError::into_inner);
        if failure.is_none() && !matches!(err, MixError::Abandoned) {
            *failure = Some(err);
        }
        reported
    }

    fn take_failure(&self) -> MixError {
        self.failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or(MixError::Abandoned)
    }

    /// Eagerly resolve every component, in provider order.
    ///
    /// The first failure aborts the build, even if the factory that observed it went on.
    /// The context is then abandoned: handles leaked by factories can no longer read from it.
    pub(crate) fn resolve_all(&self, deps: &Mixed) -> Result<(), MixError> {
        for name in &self.order {
            let result = self.resolve(deps, name);
            if self.is_abandoned() {
                let err = self.take_failure();
                #[cfg(feature = "tracing")]
                error!(component = &**name, error = %err, "composition failed");
                return Err(err);
            }
            result?;
        }
        Ok(())
    }
}
