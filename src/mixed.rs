use std::any::{type_name, Any};
use std::fmt;
use std::sync::{Arc, Weak};

use crate::resolve::Context;
use crate::{Component, Instance, MixError, Provider};

/// Composite instance exposing one resolved instance per component name.
///
/// The same handle is given to every factory during the build: reading a component which is not
/// constructed yet constructs it on demand, reading a component which is being constructed fails
/// with [MixError::Cycle]. Once [crate::Mixer::make] has returned, every component is resolved and
/// reads are plain cache lookups.
///
/// Cloning the handle is cheap and shares the same instances. Instances that keep a handle to
/// reach their dependencies later should prefer a [WeakMixed] to avoid reference cycles.
#[derive(Clone)]
pub struct Mixed {
    context: Arc<Context>,
}

/// Non-owning handle on a [Mixed] composite
#[derive(Clone)]
pub struct WeakMixed {
    context: Weak<Context>,
}

impl Mixed {
    /// Create the composite and construct all its components.
    pub(crate) fn build(providers: &[Provider]) -> Result<Self, MixError> {
        let mixed = Mixed {
            context: Arc::new(Context::new(providers)),
        };
        mixed.context.resolve_all(&mixed)?;
        Ok(mixed)
    }

    /// Obtain the instance of a component.
    ///
    /// Return an error if no provider has this name, if the instance has another type,
    /// or if the component is currently being constructed.
    pub fn get<T: Any + Send + Sync>(&self, component: &Component<T>) -> Result<Arc<T>, MixError> {
        let name = component.name();
        self.get_by_name(name)?
            .downcast::<T>()
            .map_err(|_| MixError::TypeMismatch {
                name: name.to_owned(),
                expected: type_name::<T>(),
                actual: self
                    .context
                    .slot(name)
                    .map_or("<unknown>", |slot| slot.type_name()),
            })
    }

    /// Obtain the type-erased instance of a component.
    pub fn get_by_name(&self, name: &str) -> Result<Instance, MixError> {
        self.context.resolve(self, name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.context.slot(name).is_some()
    }

    /// Names of the components, in the order of their providers
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.context.names()
    }

    pub fn len(&self) -> usize {
        self.context.names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn downgrade(&self) -> WeakMixed {
        WeakMixed {
            context: Arc::downgrade(&self.context),
        }
    }

    /// Check if two handles share the same composite
    pub fn ptr_eq(&self, other: &Mixed) -> bool {
        Arc::ptr_eq(&self.context, &other.context)
    }
}

impl WeakMixed {
    /// Obtain a [Mixed] handle if the composite is still alive.
    pub fn upgrade(&self) -> Option<Mixed> {
        self.context.upgrade().map(|context| Mixed { context })
    }
}

impl fmt::Debug for Mixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_abandoned() {
            return f.write_str("Mixed(<abandoned>)");
        }
        let mut map = f.debug_map();
        for name in self.context.names() {
            if let Some(slot) = self.context.slot(name) {
                map.entry(&name, &slot.state().label());
            }
        }
        map.finish()
    }
}

impl fmt::Debug for WeakMixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakMixed")
    }
}
