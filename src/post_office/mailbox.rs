// src/post_office/mailbox.rs

use crate::message::Value;

use std::collections::VecDeque;

/// The FIFO of pending messages for one `(sink, inbox)` pair.
///
/// A mailbox stays alive while it has pending messages or at least one
/// active link; the post office reclaims it once both are gone.
#[derive(Debug, Default)]
pub(crate) struct Mailbox {
  queue: VecDeque<Value>,
  links: usize,
}

impl Mailbox {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn link_attached(&mut self) {
    self.links += 1;
  }

  pub fn link_detached(&mut self) {
    self.links = self.links.saturating_sub(1);
  }

  pub fn push(&mut self, message: Value) {
    self.queue.push_back(message);
  }

  /// Takes every pending message, oldest first.
  pub fn drain(&mut self) -> impl Iterator<Item = Value> + '_ {
    self.queue.drain(..)
  }

  pub fn len(&self) -> usize {
    self.queue.len()
  }

  pub fn is_empty(&self) -> bool {
    self.queue.is_empty()
  }

  pub fn is_linked(&self) -> bool {
    self.links > 0
  }

  /// True once the mailbox has neither links nor pending messages.
  pub fn is_reclaimable(&self) -> bool {
    !self.is_linked() && self.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keeps_fifo_order() {
    let mut mailbox = Mailbox::new();
    mailbox.push(Value::Int(1));
    mailbox.push(Value::Int(2));
    mailbox.push(Value::Int(3));
    let drained: Vec<_> = mailbox.drain().collect();
    assert_eq!(drained, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    assert!(mailbox.is_empty());
  }

  #[test]
  fn survives_unlinking_until_drained() {
    let mut mailbox = Mailbox::new();
    mailbox.link_attached();
    mailbox.push(Value::from("pending"));
    mailbox.link_detached();
    assert!(!mailbox.is_reclaimable());
    assert_eq!(mailbox.drain().count(), 1);
    assert!(mailbox.is_reclaimable());
  }

  #[test]
  fn linked_mailbox_is_never_reclaimable() {
    let mut mailbox = Mailbox::new();
    mailbox.link_attached();
    mailbox.link_attached();
    mailbox.link_detached();
    assert!(mailbox.is_linked());
    assert!(!mailbox.is_reclaimable());
  }
}
