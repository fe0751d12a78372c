// src/scheduler/core.rs

use crate::coroutine::{CoroutineHandle, CoroutineId};
use crate::error::CourierError;
use crate::options::SchedulerOptions;
use crate::post_office::{IPostOffice, PostOffice};

use std::collections::{HashSet, VecDeque};

/// Drives registered coroutines one at a time, round robin.
///
/// Each [`step`](Scheduler::step) runs the coroutine at the head of the run
/// queue: its queued messages are retrieved from the post office and fed to
/// it one by one, and everything it emits is posted back.
#[derive(Debug)]
pub struct Scheduler<P: IPostOffice = PostOffice> {
  pub(super) post_office: P,
  pub(super) options: SchedulerOptions,
  pub(super) run_queue: VecDeque<CoroutineHandle>,
  /// Coroutines that emitted a `Shutdown` on `signal` and have not terminated yet.
  pub(super) shutting_down: HashSet<CoroutineId>,
}

impl<P: IPostOffice> Scheduler<P> {
  /// Creates a strict scheduler around `post_office`.
  pub fn new(post_office: P) -> Self {
    Self::with_options(post_office, SchedulerOptions::default())
  }

  /// Creates a scheduler where registration and unregistration are idempotent.
  pub fn lenient(post_office: P) -> Self {
    Self::with_options(post_office, SchedulerOptions::lenient())
  }

  pub fn with_options(post_office: P, options: SchedulerOptions) -> Self {
    Self {
      post_office,
      options,
      run_queue: VecDeque::new(),
      shutting_down: HashSet::new(),
    }
  }

  pub fn options(&self) -> SchedulerOptions {
    self.options
  }

  pub fn post_office(&self) -> &P {
    &self.post_office
  }

  pub fn post_office_mut(&mut self) -> &mut P {
    &mut self.post_office
  }

  /// Consumes the scheduler, handing back its post office.
  pub fn into_post_office(self) -> P {
    self.post_office
  }

  /// Appends coroutines to the run queue, in order.
  ///
  /// Fails with `Duplicate` on the first coroutine already scheduled unless
  /// duplicates are ignored.
  pub fn register(&mut self, coroutines: &[CoroutineHandle]) -> Result<(), CourierError> {
    for coroutine in coroutines {
      if self.contains(coroutine.id()) {
        if self.options.add_ignores_duplicates {
          tracing::debug!(coroutine = %coroutine.id(), "Scheduler ignoring duplicate coroutine");
          continue;
        }
        return Err(CourierError::Duplicate(coroutine.id()));
      }
      self.run_queue.push_back(coroutine.clone());
      tracing::debug!(
        coroutine = %coroutine.id(),
        lazy = coroutine.is_lazy(),
        queued = self.run_queue.len(),
        "Scheduler registered coroutine"
      );
    }
    Ok(())
  }

  /// Closes coroutines and removes them from the run queue.
  ///
  /// Fails with `NotAdded` on the first unknown coroutine unless missing
  /// coroutines are ignored. A coroutine whose `close` fails stays scheduled.
  pub fn unregister(&mut self, coroutines: &[CoroutineHandle]) -> Result<(), CourierError> {
    for coroutine in coroutines {
      let id = coroutine.id();
      let position = match self.run_queue.iter().position(|queued| queued.id() == id) {
        Some(position) => position,
        None if self.options.remove_ignores_missing => {
          tracing::debug!(coroutine = %id, "Scheduler ignoring removal of unknown coroutine");
          continue;
        }
        None => return Err(CourierError::NotAdded(id)),
      };
      // A failed close leaves the coroutine scheduled.
      coroutine.close()?;
      self.run_queue.remove(position);
      self.shutting_down.remove(&id);
      tracing::debug!(coroutine = %id, "Scheduler unregistered coroutine");
    }
    Ok(())
  }

  /// Runs one step per coroutine present when the cycle starts.
  ///
  /// A coroutine that terminates does not rotate, so the next one moves up
  /// to the head and still gets its turn in this cycle.
  pub fn cycle(&mut self) -> Result<(), CourierError> {
    let mut remaining = self.run_queue.len();
    while remaining > 0 && !self.run_queue.is_empty() {
      self.step()?;
      remaining -= 1;
    }
    Ok(())
  }

  /// Runs `cycles` cycles, or until the run queue is empty when `None`.
  ///
  /// The run queue persists, so a later call picks up where this one left
  /// off. Without a cycle limit this only returns once every coroutine has
  /// terminated.
  pub fn run(&mut self, cycles: Option<usize>) -> Result<(), CourierError> {
    match cycles {
      Some(cycles) => {
        for _ in 0..cycles {
          self.cycle()?;
        }
      }
      None => {
        while !self.run_queue.is_empty() {
          self.cycle()?;
        }
        tracing::debug!("Scheduler run queue drained");
      }
    }
    Ok(())
  }

  /// Number of coroutines in the run queue.
  pub fn len(&self) -> usize {
    self.run_queue.len()
  }

  pub fn is_empty(&self) -> bool {
    self.run_queue.is_empty()
  }

  pub fn contains(&self, id: CoroutineId) -> bool {
    self.run_queue.iter().any(|queued| queued.id() == id)
  }

  /// Ids in run queue order, head first.
  pub fn run_queue(&self) -> Vec<CoroutineId> {
    self.run_queue.iter().map(CoroutineHandle::id).collect()
  }

  pub fn is_shutting_down(&self, id: CoroutineId) -> bool {
    self.shutting_down.contains(&id)
  }
}
