// tests/common.rs
#![allow(dead_code)] // Not every test file uses every helper

use courier::coroutine::FnCoroutine;
use courier::ports::{CONTROL, SIGNAL};
use courier::{CoroutineHandle, Delivery, Message, Outcome, PostOffice, Scheduler};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

pub type Log<T> = Rc<RefCell<Vec<T>>>;

// Use std::sync::Once for one-time initialization
static TRACING_INIT: Once = Once::new();

// Setup function to initialize tracing
pub fn setup_tracing() {
  TRACING_INIT.call_once(|| {
    // Can be overridden by RUST_LOG env variable
    let default_filter = "courier=debug,warn";
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = FmtSubscriber::builder()
      .with_max_level(tracing::Level::TRACE)
      .with_env_filter(env_filter)
      .with_target(true)
      .with_line_number(true)
      .with_test_writer() // Write to test output capture
      .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set global tracing subscriber");
  });
}

// Helper to create a strict scheduler with tracing enabled
pub fn test_scheduler() -> Scheduler {
  setup_tracing();
  Scheduler::new(PostOffice::new())
}

pub fn new_log<T>() -> Log<T> {
  Rc::new(RefCell::new(Vec::new()))
}

/// A coroutine that records every delivery it receives and emits nothing.
/// It terminates on the first `Shutdown`.
pub fn recorder(lazy: bool) -> (CoroutineHandle, Log<Delivery>) {
  let log = new_log();
  let sink = log.clone();
  let body = FnCoroutine::new(move |delivery: Delivery| {
    let shutdown = delivery.message.is_shutdown();
    sink.borrow_mut().push(delivery);
    if shutdown {
      return Ok(Outcome::Terminated);
    }
    Ok(Outcome::Empty)
  });
  (CoroutineHandle::with_laziness(body, lazy), log)
}

/// A non-lazy coroutine that appends `name` to `log` every time it runs.
pub fn ticker(name: &'static str, log: &Log<&'static str>) -> CoroutineHandle {
  let log = log.clone();
  CoroutineHandle::not_lazy(FnCoroutine::new(move |_delivery: Delivery| {
    log.borrow_mut().push(name);
    Ok(Outcome::Empty)
  }))
}

/// A non-lazy coroutine that runs once, logging `name`, then terminates.
pub fn one_shot(name: &'static str, log: &Log<&'static str>) -> CoroutineHandle {
  let log = log.clone();
  CoroutineHandle::not_lazy(FnCoroutine::new(move |_delivery: Delivery| {
    log.borrow_mut().push(name);
    Ok(Outcome::Terminated)
  }))
}

/// A non-lazy coroutine that emits a `Shutdown` on `signal` the first time it
/// runs and terminates once it has received `needed` shutdowns on `control`.
pub fn reluctant(needed: usize, received: &Log<Delivery>) -> CoroutineHandle {
  let received = received.clone();
  let mut announced = false;
  let mut shutdowns = 0;
  CoroutineHandle::not_lazy(FnCoroutine::new(move |delivery: Delivery| {
    if !announced {
      announced = true;
      return Ok(Outcome::produced(SIGNAL, Message::shutdown()));
    }
    if delivery.inbox == CONTROL && delivery.message.is_shutdown() {
      shutdowns += 1;
    }
    received.borrow_mut().push(delivery);
    if shutdowns >= needed {
      return Ok(Outcome::Terminated);
    }
    Ok(Outcome::Empty)
  }))
}
