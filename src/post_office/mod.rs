// src/post_office/mod.rs

//! Link registry and per-inbox mailboxes.

mod link;
mod mailbox;
mod office;

pub use link::{Link, Port};
pub use office::PostOffice;

use crate::coroutine::{CoroutineId, Delivery};
use crate::error::CourierError;
use crate::message::Value;

/// Routes posted messages from linked outboxes to the mailboxes of linked inboxes.
///
/// Delivering retrieved messages to coroutines is the scheduler's job.
pub trait IPostOffice {
  /// Registers links in order, creating mailboxes for new `(sink, inbox)` pairs.
  ///
  /// Fails with `LinkExists` on the first already registered link unless
  /// duplicates are ignored. Links before the offending one stay registered.
  fn register(&mut self, links: &[Link]) -> Result<(), CourierError>;

  /// Unregisters links in order.
  ///
  /// Fails with `NoLink` on the first unknown link unless missing links are
  /// ignored. Messages already queued for an unlinked inbox stay retrievable.
  fn unregister(&mut self, links: &[Link]) -> Result<(), CourierError>;

  /// Queues `message` on every inbox currently linked from `source.outbox`.
  ///
  /// Fails with `NoLink` if `source.outbox` is not the source of any link.
  fn post(&mut self, source: CoroutineId, outbox: &str, message: Value) -> Result<(), CourierError>;

  /// Drains every message queued for `sink`.
  ///
  /// Each inbox keeps its FIFO order. An empty result is not an error;
  /// `NotASink` is returned when `sink` has no mailbox at all.
  fn retrieve(&mut self, sink: CoroutineId) -> Result<Vec<Delivery>, CourierError>;
}
