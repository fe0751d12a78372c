// src/coroutine/mod.rs

//! The coroutine contract consumed by the scheduler, the registration
//! handle wrapping it, and a few ready-made coroutines.

pub mod builtins;
pub mod handle;

pub use builtins::{filter_from_fn, from_fn, null_sink, producer_from_iter, sink_from_fn};
pub use builtins::{Filter, FnCoroutine, NullSink, Producer, Sink};
pub use handle::{CoroutineHandle, CoroutineId};

use crate::error::CourierError;
use crate::message::Value;

/// One inbound `(inbox, message)` pair handed to a coroutine.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
  pub inbox: String,
  pub message: Value,
}

impl Delivery {
  pub fn new(inbox: impl Into<String>, message: impl Into<Value>) -> Self {
    Self {
      inbox: inbox.into(),
      message: message.into(),
    }
  }

  pub fn is_on(&self, inbox: &str) -> bool {
    self.inbox == inbox
  }
}

/// What a coroutine did with one delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
  /// Emitted `message` on `outbox`.
  Produced { outbox: String, message: Value },
  /// Consumed the delivery without output.
  Empty,
  /// The coroutine has finished; no further calls will do anything.
  Terminated,
}

impl Outcome {
  pub fn produced(outbox: impl Into<String>, message: impl Into<Value>) -> Self {
    Outcome::Produced {
      outbox: outbox.into(),
      message: message.into(),
    }
  }

  pub fn is_terminated(&self) -> bool {
    matches!(self, Outcome::Terminated)
  }
}

/// A schedulable unit driven one delivery at a time.
///
/// Implementations must report [`Outcome::Terminated`] from every call to
/// `resume` or `raise` made after `close`.
pub trait ICoroutine {
  /// Hands one delivery to the coroutine.
  ///
  /// The very first call on a fresh coroutine receives `None` and only
  /// activates it; its outcome is discarded. [`CoroutineHandle`] takes care
  /// of that call.
  fn resume(&mut self, delivery: Option<Delivery>) -> Result<Outcome, CourierError>;

  /// Injects a failure at the coroutine's current suspension point.
  ///
  /// An unhandled failure is returned as the `Err`. The default
  /// implementation handles nothing; a body that can be closed overrides it
  /// to report [`Outcome::Terminated`] once closed.
  fn raise(&mut self, error: CourierError) -> Result<Outcome, CourierError> {
    Err(error)
  }

  /// Forces the coroutine to terminate. Repeated calls have no effect.
  fn close(&mut self);
}
