use std::sync::Arc;

use mixdi::*;
use tracing_subscriber::{fmt, EnvFilter};

// Components implemented by types which build themselves from the composite

struct Clock;

impl Clock {
    fn get_time(&self) -> u64 {
        1000
    }
}

impl Construct for Clock {
    fn construct(_deps: &Mixed) -> Result<Self, MixError> {
        Ok(Clock)
    }
}

struct Random;

impl Random {
    fn get_random(&self) -> f64 {
        0.5
    }
}

impl Construct for Random {
    fn construct(_deps: &Mixed) -> Result<Self, MixError> {
        Ok(Random)
    }
}

struct MyService {
    clock: Arc<Clock>,
    random: Arc<Random>,
}

impl MyService {
    fn get_time_and_random(&self) -> (u64, f64) {
        (self.clock.get_time(), self.random.get_random())
    }
}

impl Construct for MyService {
    fn construct(deps: &Mixed) -> Result<Self, MixError> {
        Ok(MyService {
            clock: deps.get(&CLOCK)?,
            random: deps.get(&RANDOM)?,
        })
    }
}

const CLOCK: Component<Clock> = Component::new("clock");
const RANDOM: Component<Random> = Component::new("random");
const MY_SERVICE: Component<MyService> = Component::new("myService");

fn main() -> Result<(), MixError> {
    // RUST_LOG=debug shows the construction of each component
    let _ = fmt().with_env_filter(EnvFilter::from_default_env()).try_init();

    let app = mix![MY_SERVICE.construct(), CLOCK.construct(), RANDOM.construct()].make()?;
    println!("{:?}", app.get(&MY_SERVICE)?.get_time_and_random());

    Ok(())
}
