//! Providers: a component name bundled with the factory building its instance.
//!
//! A factory is either a plain closure or a constructor-style function derived from the
//! [Construct] trait. Both are stored behind the [Factory] tag and run through [invoke],
//! so the mixer never needs to know which convention a provider uses.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use crate::{MixError, Mixed};

/// Type-erased instance produced by a provider and cached in a [Mixed] composite
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Shared, type-erased factory closure
pub type FactoryFn = Arc<dyn Fn(&Mixed) -> Result<Instance, MixError> + Send + Sync>;

/// Type-erased constructor, monomorphized from a [Construct] implementation
pub type ConstructorFn = fn(&Mixed) -> Result<Instance, MixError>;

/// Build an instance from its dependencies.
///
/// Implement this for types that know how to assemble themselves out of a [Mixed] composite,
/// then register them with [Provider::constructor] or [crate::Component::construct].
pub trait Construct: Sized + Send + Sync + 'static {
    fn construct(deps: &Mixed) -> Result<Self, MixError>;
}

/// The calling convention of a provider factory
#[derive(Clone)]
pub enum Factory {
    Function(FactoryFn),
    Constructor(ConstructorFn),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryKind {
    Function,
    Constructor,
}

impl Factory {
    pub fn kind(&self) -> FactoryKind {
        match self {
            Factory::Function(_) => FactoryKind::Function,
            Factory::Constructor(_) => FactoryKind::Constructor,
        }
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Factory::{:?}", self.kind())
    }
}

/// Run a factory against a dependency bag, whatever its calling convention.
///
/// Errors raised by the factory are returned unmodified.
pub fn invoke(factory: &Factory, deps: &Mixed) -> Result<Instance, MixError> {
    match factory {
        Factory::Function(f) => f(deps),
        Factory::Constructor(ctor) => ctor(deps),
    }
}

fn construct_erased<T: Construct>(deps: &Mixed) -> Result<Instance, MixError> {
    let instance: Instance = Arc::new(T::construct(deps)?);
    Ok(instance)
}

/// Immutable association between a component name and its factory
#[derive(Clone)]
pub struct Provider {
    name: Arc<str>,
    type_name: &'static str,
    factory: Factory,
}

impl Provider {
    /// Create a provider from an infallible factory closure.
    pub fn new<T, F>(name: impl Into<Arc<str>>, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Mixed) -> T + Send + Sync + 'static,
    {
        Self::try_new(name, move |deps: &Mixed| Ok(factory(deps)))
    }

    /// Create a provider from a fallible factory closure.
    ///
    /// Any error returned by the closure aborts the whole composition.
    pub fn try_new<T, F>(name: impl Into<Arc<str>>, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Mixed) -> Result<T, MixError> + Send + Sync + 'static,
    {
        let erased: FactoryFn = Arc::new(move |deps: &Mixed| {
            let instance: Instance = Arc::new(factory(deps)?);
            Ok(instance)
        });
        Self {
            name: name.into(),
            type_name: type_name::<T>(),
            factory: Factory::Function(erased),
        }
    }

    /// Create a provider using the [Construct] implementation of the target type.
    pub fn constructor<T: Construct>(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name::<T>(),
            factory: Factory::Constructor(construct_erased::<T>),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> &Arc<str> {
        &self.name
    }

    /// Name of the instance type produced by the factory
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    pub fn kind(&self) -> FactoryKind {
        self.factory.kind()
    }

    /// Run the factory once against the given dependencies.
    ///
    /// This bypasses any caching: the mixer is responsible for calling it at most once per build.
    pub fn invoke(&self, deps: &Mixed) -> Result<Instance, MixError> {
        invoke(&self.factory, deps)
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("kind", &self.kind())
            .finish()
    }
}
