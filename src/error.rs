// src/error.rs

use crate::coroutine::CoroutineId;
use crate::post_office::{Link, Port};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive] // Allows adding more variants later without breaking change
pub enum CourierError {
  // --- Post Office Errors ---
  #[error("Link already registered: {0}")]
  LinkExists(Link),
  #[error(
    "No link registered from {outlet}{}",
    .inlet.as_ref().map(|inlet| format!(" to {}", inlet)).unwrap_or_default()
  )]
  NoLink { outlet: Port, inlet: Option<Port> },
  #[error("Coroutine {0} is not registered as a sink")]
  NotASink(CoroutineId),

  // --- Scheduler Errors ---
  #[error("Coroutine {0} is already registered with the scheduler")]
  Duplicate(CoroutineId),
  #[error("Coroutine {0} is not registered with the scheduler")]
  NotAdded(CoroutineId),
  #[error("Lazy coroutine {0} has no inbound links and can never run")]
  NeverRun(CoroutineId),

  // --- Container Errors ---
  #[error("Link crosses the container boundary: {0}")]
  InvalidLink(Link),

  // --- Coroutine Errors ---
  /// A failure raised inside a coroutine body, or injected into one via `raise`.
  #[error("Coroutine failure: {0}")]
  Coroutine(String),

  // --- State Errors ---
  #[error("Invalid argument provided: {0}")]
  InvalidArgument(String),
  #[error("Operation is invalid for the current state: {0}")]
  InvalidState(&'static str),
}

impl CourierError {
  /// Convenience constructor for failures raised from coroutine bodies.
  pub fn coroutine(reason: impl Into<String>) -> Self {
    CourierError::Coroutine(reason.into())
  }

  pub fn is_no_link(&self) -> bool {
    matches!(self, CourierError::NoLink { .. })
  }

  pub fn is_not_a_sink(&self) -> bool {
    matches!(self, CourierError::NotASink(_))
  }
}
