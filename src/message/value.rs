use crate::message::msg::Message;

use bytes::Bytes;

/// The payload of a delivery.
///
/// Coroutines may post plain data as well as [`Message`]s; only the latter
/// take part in the shutdown protocol.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
  /// The "nothing" payload, also used for the synthetic idle tick on `control`.
  #[default]
  Null,
  Bool(bool),
  Int(i64),
  Float(f64),
  Str(String),
  Bytes(Bytes),
  List(Vec<Value>),
  Message(Message),
}

impl Value {
  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null)
  }

  /// True only for a [`Message`] whose kind is a `Shutdown`.
  pub fn is_shutdown(&self) -> bool {
    matches!(self, Value::Message(msg) if msg.is_shutdown())
  }

  pub fn as_int(&self) -> Option<i64> {
    match self {
      Value::Int(v) => Some(*v),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::Str(v) => Some(v),
      _ => None,
    }
  }

  pub fn as_message(&self) -> Option<&Message> {
    match self {
      Value::Message(msg) => Some(msg),
      _ => None,
    }
  }
}

impl From<bool> for Value {
  fn from(v: bool) -> Self {
    Value::Bool(v)
  }
}

impl From<i64> for Value {
  fn from(v: i64) -> Self {
    Value::Int(v)
  }
}

impl From<i32> for Value {
  fn from(v: i32) -> Self {
    Value::Int(v as i64)
  }
}

impl From<f64> for Value {
  fn from(v: f64) -> Self {
    Value::Float(v)
  }
}

impl From<&str> for Value {
  fn from(v: &str) -> Self {
    Value::Str(v.to_string())
  }
}

impl From<String> for Value {
  fn from(v: String) -> Self {
    Value::Str(v)
  }
}

impl From<Bytes> for Value {
  fn from(v: Bytes) -> Self {
    Value::Bytes(v)
  }
}

impl From<Vec<Value>> for Value {
  fn from(v: Vec<Value>) -> Self {
    Value::List(v)
  }
}

impl From<Message> for Value {
  fn from(v: Message) -> Self {
    Value::Message(v)
  }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(v: Option<T>) -> Self {
    v.map_or(Value::Null, Into::into)
  }
}
