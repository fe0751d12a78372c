// src/options.rs

//! Construction-time options for the post office and the scheduler.
//!
//! Every flag defaults to the strict behavior. Setting a flag turns the
//! corresponding registration call into an idempotent operation.

/// Holds the leniency flags of a [`PostOffice`](crate::post_office::PostOffice).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostOfficeOptions {
  /// Registering an already registered link is a no-op instead of `LinkExists`.
  pub link_ignores_duplicates: bool,
  /// Unregistering an unknown link is a no-op instead of `NoLink`.
  pub unlink_ignores_missing: bool,
}

impl PostOfficeOptions {
  pub fn new() -> Self {
    Self::default()
  }

  /// Options with every leniency flag set.
  pub fn lenient() -> Self {
    Self {
      link_ignores_duplicates: true,
      unlink_ignores_missing: true,
    }
  }

  pub fn link_ignores_duplicates(mut self, value: bool) -> Self {
    self.link_ignores_duplicates = value;
    self
  }

  pub fn unlink_ignores_missing(mut self, value: bool) -> Self {
    self.unlink_ignores_missing = value;
    self
  }
}

/// Holds the leniency flags of a [`Scheduler`](crate::scheduler::Scheduler).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerOptions {
  /// Registering an already scheduled coroutine is skipped instead of `Duplicate`.
  pub add_ignores_duplicates: bool,
  /// Unregistering an unknown coroutine is skipped instead of `NotAdded`.
  pub remove_ignores_missing: bool,
}

impl SchedulerOptions {
  pub fn new() -> Self {
    Self::default()
  }

  /// Options with every leniency flag set.
  pub fn lenient() -> Self {
    Self {
      add_ignores_duplicates: true,
      remove_ignores_missing: true,
    }
  }

  pub fn add_ignores_duplicates(mut self, value: bool) -> Self {
    self.add_ignores_duplicates = value;
    self
  }

  pub fn remove_ignores_missing(mut self, value: bool) -> Self {
    self.remove_ignores_missing = value;
    self
  }
}
