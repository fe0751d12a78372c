use crate::coroutine::CoroutineId;

use std::fmt;

/// A named port on a coroutine, either an outbox or an inbox.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Port {
  pub coroutine: CoroutineId,
  pub name: String,
}

impl Port {
  pub fn new(coroutine: impl Into<CoroutineId>, name: impl Into<String>) -> Self {
    Self {
      coroutine: coroutine.into(),
      name: name.into(),
    }
  }
}

impl fmt::Display for Port {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.coroutine, self.name)
  }
}

/// A directed wiring from `source.outbox` to `sink.inbox`.
///
/// Identity is the whole 4-tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
  pub source: CoroutineId,
  pub outbox: String,
  pub sink: CoroutineId,
  pub inbox: String,
}

impl Link {
  pub fn new(
    source: impl Into<CoroutineId>,
    outbox: impl Into<String>,
    sink: impl Into<CoroutineId>,
    inbox: impl Into<String>,
  ) -> Self {
    Self {
      source: source.into(),
      outbox: outbox.into(),
      sink: sink.into(),
      inbox: inbox.into(),
    }
  }

  /// The `(source, outbox)` side of the link.
  pub fn outlet(&self) -> Port {
    Port::new(self.source, self.outbox.as_str())
  }

  /// The `(sink, inbox)` side of the link.
  pub fn inlet(&self) -> Port {
    Port::new(self.sink, self.inbox.as_str())
  }
}

impl fmt::Display for Link {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{} -> {}.{}", self.source, self.outbox, self.sink, self.inbox)
  }
}
