//! Minimal dependency injection by mixing named component providers.
//!
//! # Simple use case
//!
//! ```
//! # use std::sync::Arc;
//! # use mixdi::*;
//! // Define components: a name and the type of their instance
//! struct Clock;
//! impl Clock {
//!     fn get_time(&self) -> u64 {
//!         1000
//!     }
//! }
//!
//! struct Service {
//!     clock: Arc<Clock>,
//! }
//!
//! const CLOCK: Component<Clock> = Component::new("clock");
//! const SERVICE: Component<Service> = Component::new("service");
//!
//!
//! # fn main() -> Result<(), MixError> {
//! // Implement them with providers, in any order
//! let service = SERVICE.try_provide(|deps| Ok(Service { clock: deps.get(&CLOCK)? }));
//! let clock = CLOCK.provide(|_| Clock);
//!
//! // Mix the providers and use the resulting composite
//! let app = mixer([service, clock]).make()?;
//! assert_eq!(app.get(&SERVICE)?.clock.get_time(), 1000);
//! # Ok(())
//! # }
//! ```
//!
//! # Mechanism
//!
//! * A [Component] is a typed handle pairing a name with the type of its instance.
//! * A [Provider] associates a component name with a factory. The factory receives the composite
//!   under construction and reads its own dependencies from it. Factories are either closures or
//!   types implementing [Construct].
//! * A [Mixer] holds an ordered list of providers. [Mixer::with] returns an extended mixer and
//!   [Mixer::make] builds the [Mixed] composite.
//!
//! When several providers share a name, the last one wins and the others are never invoked.
//!
//! The composite is built eagerly, each factory being called exactly once. Dependencies are
//! constructed on demand when a factory reads them, whatever the order of the providers.
//! Reading a component from its own factory, directly or through other factories, fails with
//! [MixError::Cycle]. Instances may still keep a handle on the composite and read each other
//! after the build: only construction-time cycles are rejected.

mod component;
mod mixed;
mod mixer;
mod provider;
mod resolve;

pub use component::Component;
pub use mixed::{Mixed, WeakMixed};
pub use mixer::{mixer, Mixer};
pub use provider::{
    invoke, Construct, ConstructorFn, Factory, FactoryFn, FactoryKind, Instance, Provider,
};
pub use resolve::{BoxError, MixError, MixResult};
