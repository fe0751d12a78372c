// src/coroutine/handle.rs

use crate::coroutine::{Delivery, ICoroutine, Outcome};
use crate::error::CourierError;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Source for generating the next available unique coroutine id.
static NEXT_COROUTINE_ID: AtomicUsize = AtomicUsize::new(1); // Start ids from 1.

/// Process-unique identity of a registered coroutine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoroutineId(usize);

impl CoroutineId {
  fn next() -> Self {
    CoroutineId(NEXT_COROUTINE_ID.fetch_add(1, Ordering::Relaxed))
  }

  pub fn as_usize(self) -> usize {
    self.0
  }
}

impl fmt::Display for CoroutineId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

impl From<&CoroutineHandle> for CoroutineId {
  fn from(handle: &CoroutineHandle) -> Self {
    handle.id()
  }
}

struct HandleInner {
  id: CoroutineId,
  lazy: bool,
  primed: Cell<bool>,
  body: RefCell<Box<dyn ICoroutine>>,
}

/// The registration record of a coroutine.
///
/// A handle wraps its body exactly once; clones share the body and the id,
/// so a handle can sit in a container, in the scheduler's run queue and in
/// test code at the same time. Laziness is fixed at construction.
#[derive(Clone)]
pub struct CoroutineHandle {
  inner: Rc<HandleInner>,
}

impl CoroutineHandle {
  /// Wraps a lazy coroutine: it only runs when messages are waiting for it.
  pub fn new(body: impl ICoroutine + 'static) -> Self {
    Self::with_laziness(body, true)
  }

  /// Wraps a coroutine that runs on every step, receiving a `Null` on
  /// `control` when nothing else is queued for it.
  pub fn not_lazy(body: impl ICoroutine + 'static) -> Self {
    Self::with_laziness(body, false)
  }

  pub fn with_laziness(body: impl ICoroutine + 'static, lazy: bool) -> Self {
    Self::from_boxed(Box::new(body), lazy)
  }

  pub fn from_boxed(body: Box<dyn ICoroutine>, lazy: bool) -> Self {
    let id = CoroutineId::next();
    tracing::trace!(coroutine = %id, lazy, "Coroutine handle created");
    Self {
      inner: Rc::new(HandleInner {
        id,
        lazy,
        primed: Cell::new(false),
        body: RefCell::new(body),
      }),
    }
  }

  pub fn id(&self) -> CoroutineId {
    self.inner.id
  }

  pub fn is_lazy(&self) -> bool {
    self.inner.lazy
  }

  /// Delivers one message, activating the body first if needed.
  pub fn resume(&self, delivery: Delivery) -> Result<Outcome, CourierError> {
    let mut body = self.borrow_body()?;
    self.prime(&mut **body)?;
    body.resume(Some(delivery))
  }

  /// Injects a failure into the body, activating it first if needed.
  pub fn raise(&self, error: CourierError) -> Result<Outcome, CourierError> {
    let mut body = self.borrow_body()?;
    self.prime(&mut **body)?;
    body.raise(error)
  }

  pub fn close(&self) -> Result<(), CourierError> {
    self.borrow_body()?.close();
    tracing::debug!(coroutine = %self.id(), "Coroutine closed");
    Ok(())
  }

  fn borrow_body(&self) -> Result<std::cell::RefMut<'_, Box<dyn ICoroutine>>, CourierError> {
    self
      .inner
      .body
      .try_borrow_mut()
      .map_err(|_| CourierError::InvalidState("coroutine is already running"))
  }

  fn prime(&self, body: &mut dyn ICoroutine) -> Result<(), CourierError> {
    if !self.inner.primed.get() {
      self.inner.primed.set(true);
      // The activation outcome is undefined and ignored.
      let _ = body.resume(None)?;
    }
    Ok(())
  }
}

impl PartialEq for CoroutineHandle {
  fn eq(&self, other: &Self) -> bool {
    self.inner.id == other.inner.id
  }
}

impl Eq for CoroutineHandle {}

impl std::hash::Hash for CoroutineHandle {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
    self.inner.id.hash(state);
  }
}

impl fmt::Debug for CoroutineHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CoroutineHandle")
      .field("id", &self.inner.id)
      .field("lazy", &self.inner.lazy)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::message::Value;

  /// Records whether each call carried a delivery.
  struct Probe {
    calls: Rc<RefCell<Vec<bool>>>,
  }

  impl ICoroutine for Probe {
    fn resume(&mut self, delivery: Option<Delivery>) -> Result<Outcome, CourierError> {
      self.calls.borrow_mut().push(delivery.is_some());
      Ok(Outcome::Empty)
    }

    fn close(&mut self) {}
  }

  #[test]
  fn first_delivery_is_preceded_by_activation() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let handle = CoroutineHandle::new(Probe { calls: calls.clone() });
    handle.resume(Delivery::new("inbox", Value::Int(1))).unwrap();
    handle.resume(Delivery::new("inbox", Value::Int(2))).unwrap();
    assert_eq!(*calls.borrow(), vec![false, true, true]);
  }

  #[test]
  fn clones_share_identity() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let handle = CoroutineHandle::not_lazy(Probe { calls });
    let clone = handle.clone();
    assert_eq!(handle, clone);
    assert_eq!(handle.id(), CoroutineId::from(&clone));
    assert!(!clone.is_lazy());
  }

  #[test]
  fn ids_are_unique() {
    let a = CoroutineHandle::new(Probe { calls: Rc::default() });
    let b = CoroutineHandle::new(Probe { calls: Rc::default() });
    assert_ne!(a.id(), b.id());
    assert!(a.is_lazy());
  }
}
