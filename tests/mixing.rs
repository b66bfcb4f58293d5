//! Mixing components through the public API, with trait objects as instances

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mixdi::*;

trait Clock: Send + Sync {
    fn get_time(&self) -> u64;
}

trait Random: Send + Sync {
    fn get_random(&self) -> f64;
}

trait MyService: Send + Sync {
    fn get_time_and_random(&self) -> (u64, f64);
}

struct FixedClock(u64);
impl Clock for FixedClock {
    fn get_time(&self) -> u64 {
        self.0
    }
}

struct FixedRandom;
impl Random for FixedRandom {
    fn get_random(&self) -> f64 {
        0.5
    }
}

struct MyServiceImpl {
    clock: Arc<Box<dyn Clock>>,
    random: Arc<Box<dyn Random>>,
}

impl MyService for MyServiceImpl {
    fn get_time_and_random(&self) -> (u64, f64) {
        (self.clock.get_time(), self.random.get_random())
    }
}

const CLOCK: Component<Box<dyn Clock>> = Component::new("clock");
const RANDOM: Component<Box<dyn Random>> = Component::new("random");
const MY_SERVICE: Component<Box<dyn MyService>> = Component::new("myService");

fn my_service() -> Provider {
    MY_SERVICE.try_provide(|deps| {
        let service = MyServiceImpl {
            clock: deps.get(&CLOCK)?,
            random: deps.get(&RANDOM)?,
        };
        Ok(Box::new(service) as Box<dyn MyService>)
    })
}

fn clock(time: u64) -> Provider {
    CLOCK.provide(move |_| Box::new(FixedClock(time)) as Box<dyn Clock>)
}

fn random() -> Provider {
    RANDOM.provide(|_| Box::new(FixedRandom) as Box<dyn Random>)
}

#[test]
fn service_before_its_dependencies() -> Result<(), MixError> {
    let app = mixer([my_service(), clock(1000), random()]).make()?;

    assert_eq!(app.get(&MY_SERVICE)?.get_time_and_random(), (1000, 0.5));
    assert_eq!(
        app.names().collect::<Vec<_>>(),
        ["myService", "clock", "random"]
    );
    Ok(())
}

#[test]
fn override_in_extended_mixer() -> Result<(), MixError> {
    let base = mix![my_service(), clock(1000), random()];
    let patched = base.with([clock(2000)]);

    assert_eq!(
        base.make()?.get(&MY_SERVICE)?.get_time_and_random(),
        (1000, 0.5)
    );
    assert_eq!(
        patched.make()?.get(&MY_SERVICE)?.get_time_and_random(),
        (2000, 0.5)
    );
    Ok(())
}

#[test]
fn share_composite_between_threads() -> Result<(), MixError> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = {
        let calls = calls.clone();
        CLOCK.provide(move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Box::new(FixedClock(7)) as Box<dyn Clock>
        })
    };
    let app = mixer([counted]).make()?;

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let app = app.clone();
            std::thread::spawn(move || app.get(&CLOCK).map(|clock| clock.get_time()))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap()?, 7);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn collect_providers() -> Result<(), MixError> {
    let mixer: Mixer = (1..=3u32)
        .map(|n| Provider::new(format!("n{n}"), move |_| n))
        .collect();
    let app = mixer.make()?;

    assert_eq!(app.len(), 3);
    assert!(app.contains("n2"));
    let n3 = app.get_by_name("n3")?;
    assert_eq!(n3.downcast_ref::<u32>(), Some(&3));
    Ok(())
}
