use std::fmt;

/// The tag of a [`Message`](super::Message).
///
/// Kinds form a three level chain: a `ProducerFinished` is a `Shutdown`,
/// which is a `Message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessageKind {
  #[default]
  Message,
  /// Tells the receiver to clean up, forward the shutdown on `signal` and exit.
  Shutdown,
  /// A `Shutdown` emitted by a producer that ran out of data.
  ProducerFinished,
}

impl MessageKind {
  /// Returns the kind this one specializes, if any.
  pub fn parent(self) -> Option<MessageKind> {
    match self {
      MessageKind::Message => None,
      MessageKind::Shutdown => Some(MessageKind::Message),
      MessageKind::ProducerFinished => Some(MessageKind::Shutdown),
    }
  }

  /// True if `self` is `other` or one of its specializations.
  pub fn is_a(self, other: MessageKind) -> bool {
    let mut current = Some(self);
    while let Some(kind) = current {
      if kind == other {
        return true;
      }
      current = kind.parent();
    }
    false
  }

  pub fn is_shutdown(self) -> bool {
    self.is_a(MessageKind::Shutdown)
  }

  pub fn name(self) -> &'static str {
    match self {
      MessageKind::Message => "Message",
      MessageKind::Shutdown => "Shutdown",
      MessageKind::ProducerFinished => "ProducerFinished",
    }
  }
}

impl fmt::Display for MessageKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn producer_finished_is_a_shutdown_and_a_message() {
    assert!(MessageKind::ProducerFinished.is_a(MessageKind::Shutdown));
    assert!(MessageKind::ProducerFinished.is_a(MessageKind::Message));
    assert!(MessageKind::ProducerFinished.is_shutdown());
  }

  #[test]
  fn plain_message_is_not_a_shutdown() {
    assert!(!MessageKind::Message.is_shutdown());
    assert!(!MessageKind::Message.is_a(MessageKind::ProducerFinished));
    assert!(!MessageKind::Shutdown.is_a(MessageKind::ProducerFinished));
  }
}
