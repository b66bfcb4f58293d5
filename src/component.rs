use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use crate::{Construct, MixError, Mixed, Provider};

/// Typed handle pairing a component name with the type of its instance.
///
/// Handles carry no data beyond the name: they are meant to be declared as constants and
/// shared between the providers implementing a component and the ones depending on it.
///
/// ```
/// # use mixdi::*;
/// struct Clock;
/// const CLOCK: Component<Clock> = Component::new("clock");
///
/// let provider = CLOCK.provide(|_| Clock);
/// assert_eq!(provider.name(), "clock");
/// ```
pub struct Component<T> {
    name: &'static str,
    _instance: PhantomData<fn() -> T>,
}

impl<T> Component<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _instance: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: Any + Send + Sync> Component<T> {
    /// Implement this component with an infallible factory closure.
    pub fn provide<F>(&self, factory: F) -> Provider
    where
        F: Fn(&Mixed) -> T + Send + Sync + 'static,
    {
        Provider::new(self.name, factory)
    }

    /// Implement this component with a fallible factory closure.
    pub fn try_provide<F>(&self, factory: F) -> Provider
    where
        F: Fn(&Mixed) -> Result<T, MixError> + Send + Sync + 'static,
    {
        Provider::try_new(self.name, factory)
    }
}

impl<T: Construct> Component<T> {
    /// Implement this component with the [Construct] implementation of its instance type.
    pub fn construct(&self) -> Provider {
        Provider::constructor::<T>(self.name)
    }
}

// Manual impls: the handle is copyable whatever the instance type
impl<T> Clone for Component<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Component<T> {}

impl<T> fmt::Debug for Component<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component")
            .field(&self.name)
            .field(&std::any::type_name::<T>())
            .finish()
    }
}
