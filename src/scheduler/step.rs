// src/scheduler/step.rs

use crate::coroutine::{CoroutineHandle, Delivery, Outcome};
use crate::error::CourierError;
use crate::message::{Message, Value};
use crate::ports::{CONTROL, SIGNAL};
use crate::post_office::IPostOffice;
use crate::scheduler::Scheduler;

impl<P: IPostOffice> Scheduler<P> {
  /// Runs the coroutine at the head of the run queue once.
  ///
  /// Every inbound message for this tick is fed to it in order and every
  /// output is posted. A coroutine that terminates is dropped from the run
  /// queue; otherwise it rotates to the tail. A lazy coroutine with nothing
  /// queued just rotates.
  pub fn step(&mut self) -> Result<(), CourierError> {
    let current = match self.run_queue.front() {
      Some(current) => current.clone(),
      None => return Err(CourierError::InvalidState("no coroutines registered")),
    };

    let inbound = self.inbound_for(&current)?;
    let mut terminated = false;
    for delivery in inbound {
      tracing::trace!(coroutine = %current.id(), inbox = %delivery.inbox, "Scheduler delivering message");
      match current.resume(delivery)? {
        Outcome::Produced { outbox, message } => self.dispatch(&current, &outbox, message)?,
        Outcome::Empty => {}
        Outcome::Terminated => {
          terminated = true;
          break;
        }
      }
    }

    if terminated {
      self.run_queue.pop_front();
      self.shutting_down.remove(&current.id());
      tracing::debug!(
        coroutine = %current.id(),
        remaining = self.run_queue.len(),
        "Scheduler removed terminated coroutine"
      );
    } else {
      self.run_queue.rotate_left(1);
    }
    Ok(())
  }

  /// Computes what `coroutine` receives this tick.
  fn inbound_for(&mut self, coroutine: &CoroutineHandle) -> Result<Vec<Delivery>, CourierError> {
    let id = coroutine.id();
    if self.shutting_down.contains(&id) {
      return Ok(vec![Delivery::new(CONTROL, Message::shutdown())]);
    }

    let retrieved = match self.post_office.retrieve(id) {
      Ok(retrieved) => retrieved,
      Err(e) if e.is_not_a_sink() => {
        if coroutine.is_lazy() {
          tracing::error!(coroutine = %id, "Lazy coroutine has no inbound links");
          return Err(CourierError::NeverRun(id));
        }
        Vec::new()
      }
      Err(e) => return Err(e),
    };

    if retrieved.is_empty() && !coroutine.is_lazy() {
      return Ok(vec![Delivery::new(CONTROL, Value::Null)]);
    }
    Ok(retrieved)
  }

  /// Posts one output of `coroutine`, tracking the start of its shutdown.
  fn dispatch(&mut self, coroutine: &CoroutineHandle, outbox: &str, message: Value) -> Result<(), CourierError> {
    let id = coroutine.id();
    let is_shutdown = message.is_shutdown();
    if is_shutdown && outbox == SIGNAL && self.shutting_down.insert(id) {
      tracing::debug!(coroutine = %id, "Coroutine entered shutdown");
    }

    match self.post_office.post(id, outbox, message) {
      Ok(()) => Ok(()),
      Err(e) if is_shutdown && e.is_no_link() => {
        tracing::trace!(coroutine = %id, outbox, "Discarding unroutable shutdown message");
        Ok(())
      }
      Err(e) => Err(e),
    }
  }
}
