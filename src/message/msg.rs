use crate::message::kind::MessageKind;
use crate::message::value::Value;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A tagged bag of named attributes, fixed at construction.
///
/// Cloning is cheap: the attribute map is shared, so a message fanned out
/// to several mailboxes is stored once.
#[derive(Clone, Default, PartialEq)]
pub struct Message {
  kind: MessageKind,
  attributes: Arc<BTreeMap<String, Value>>,
}

impl Message {
  /// Creates a generic message with no attributes.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a `Shutdown` message with no attributes.
  pub fn shutdown() -> Self {
    Self::of_kind(MessageKind::Shutdown)
  }

  /// Creates a `ProducerFinished` message with no attributes.
  pub fn producer_finished() -> Self {
    Self::of_kind(MessageKind::ProducerFinished)
  }

  pub fn of_kind(kind: MessageKind) -> Self {
    Self {
      kind,
      attributes: Arc::default(),
    }
  }

  /// Creates a message of `kind` carrying the given attributes.
  /// A repeated name keeps the last value.
  pub fn with_attributes<K, V, I>(kind: MessageKind, attributes: I) -> Self
  where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
  {
    let attributes = attributes
      .into_iter()
      .map(|(name, value)| (name.into(), value.into()))
      .collect::<BTreeMap<_, _>>();
    Self {
      kind,
      attributes: Arc::new(attributes),
    }
  }

  pub fn kind(&self) -> MessageKind {
    self.kind
  }

  pub fn is_shutdown(&self) -> bool {
    self.kind.is_shutdown()
  }

  /// Returns the attribute named `name`, if present.
  pub fn get(&self, name: &str) -> Option<&Value> {
    self.attributes.get(name)
  }

  /// Iterates over the attributes in name order.
  pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
    self.attributes.iter().map(|(name, value)| (name.as_str(), value))
  }

  pub fn len(&self) -> usize {
    self.attributes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.attributes.is_empty()
  }
}

impl fmt::Debug for Message {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut out = f.debug_struct(self.kind.name());
    for (name, value) in self.attributes.iter() {
      out.field(name, value);
    }
    out.finish()
  }
}
