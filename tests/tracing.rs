//! Composition with a tracing subscriber installed

#![cfg(feature = "tracing")]

use mixdi::*;
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn mix_with_subscriber() -> Result<(), MixError> {
    init_tracing();

    let left = Component::<u32>::new("left");
    let right = Component::<u32>::new("right");
    let sum = Component::<u32>::new("sum");

    let app = mixer([
        sum.try_provide(move |deps| Ok(*deps.get(&left)? + *deps.get(&right)?)),
        left.provide(|_| 2),
        right.provide(|_| 1),
    ])
    .with([right.provide(|_| 3)])
    .make()?;

    assert_eq!(*app.get(&sum)?, 5);
    Ok(())
}

#[test]
fn cycle_with_subscriber() {
    init_tracing();

    let ouroboros = Component::<u8>::new("ouroboros");
    let err = mixer([ouroboros.try_provide(move |deps| deps.get(&ouroboros).map(|v| *v))])
        .make()
        .unwrap_err();

    assert!(matches!(err, MixError::Cycle { ref name } if name == "ouroboros"));
}
