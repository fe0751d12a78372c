// src/coroutine/builtins.rs

//! Ready-made coroutines for the common producer / filter / sink shapes.
//!
//! All of them follow the shutdown protocol: a `Shutdown` message arriving
//! on any inbox is forwarded on `signal`, and the following call reports
//! termination.

use crate::coroutine::{CoroutineHandle, Delivery, ICoroutine, Outcome};
use crate::error::CourierError;
use crate::message::{Message, Value};
use crate::ports::{INBOX, OUTBOX, SIGNAL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Lifecycle {
  #[default]
  Running,
  /// A `Shutdown` has been emitted; the next call terminates.
  Finishing,
  Closed,
}

impl Lifecycle {
  /// Handles everything that does not depend on the coroutine body.
  /// Returns `None` when the delivery is for the body to process.
  fn gate(&mut self, delivery: Option<&Delivery>) -> Option<Outcome> {
    match *self {
      Lifecycle::Closed => return Some(Outcome::Terminated),
      Lifecycle::Finishing => {
        *self = Lifecycle::Closed;
        return Some(Outcome::Terminated);
      }
      Lifecycle::Running => {}
    }
    let delivery = match delivery {
      Some(delivery) => delivery,
      None => return Some(Outcome::Empty),
    };
    if delivery.message.is_shutdown() {
      return Some(self.finish(delivery.message.clone()));
    }
    None
  }

  fn finish(&mut self, shutdown: Value) -> Outcome {
    *self = Lifecycle::Finishing;
    Outcome::produced(SIGNAL, shutdown)
  }

  /// Injected failures are re-raised while running; once the coroutine is
  /// finishing or closed they only report termination.
  fn raise(&mut self, error: CourierError) -> Result<Outcome, CourierError> {
    match *self {
      Lifecycle::Running => Err(error),
      Lifecycle::Finishing | Lifecycle::Closed => {
        *self = Lifecycle::Closed;
        Ok(Outcome::Terminated)
      }
    }
  }

  fn close(&mut self) {
    *self = Lifecycle::Closed;
  }
}

/// Accepts and discards every message.
#[derive(Debug, Default)]
pub struct NullSink {
  lifecycle: Lifecycle,
}

impl NullSink {
  pub fn new() -> Self {
    Self::default()
  }
}

impl ICoroutine for NullSink {
  fn resume(&mut self, delivery: Option<Delivery>) -> Result<Outcome, CourierError> {
    Ok(self.lifecycle.gate(delivery.as_ref()).unwrap_or(Outcome::Empty))
  }

  fn raise(&mut self, error: CourierError) -> Result<Outcome, CourierError> {
    self.lifecycle.raise(error)
  }

  fn close(&mut self) {
    self.lifecycle.close();
  }
}

/// Adapts a closure over deliveries into a coroutine.
///
/// The closure sees every delivery, including shutdowns, and decides on its
/// own when to return [`Outcome::Terminated`].
pub struct FnCoroutine<F> {
  f: F,
  closed: bool,
}

impl<F> FnCoroutine<F>
where
  F: FnMut(Delivery) -> Result<Outcome, CourierError>,
{
  pub fn new(f: F) -> Self {
    Self { f, closed: false }
  }
}

impl<F> ICoroutine for FnCoroutine<F>
where
  F: FnMut(Delivery) -> Result<Outcome, CourierError>,
{
  fn resume(&mut self, delivery: Option<Delivery>) -> Result<Outcome, CourierError> {
    if self.closed {
      return Ok(Outcome::Terminated);
    }
    let delivery = match delivery {
      Some(delivery) => delivery,
      None => return Ok(Outcome::Empty),
    };
    let outcome = (self.f)(delivery)?;
    if outcome.is_terminated() {
      self.closed = true;
    }
    Ok(outcome)
  }

  fn raise(&mut self, error: CourierError) -> Result<Outcome, CourierError> {
    if self.closed {
      return Ok(Outcome::Terminated);
    }
    Err(error)
  }

  fn close(&mut self) {
    self.closed = true;
  }
}

/// Emits `f(message)` on `outbox` for every message received on `inbox`.
pub struct Filter<F> {
  f: F,
  suppress_none: bool,
  lifecycle: Lifecycle,
}

impl<F> Filter<F>
where
  F: FnMut(Value) -> Result<Value, CourierError>,
{
  pub fn new(f: F) -> Self {
    Self {
      f,
      suppress_none: false,
      lifecycle: Lifecycle::default(),
    }
  }

  /// When set, `Null` results are swallowed instead of emitted.
  pub fn suppress_none(mut self, value: bool) -> Self {
    self.suppress_none = value;
    self
  }
}

impl<F> ICoroutine for Filter<F>
where
  F: FnMut(Value) -> Result<Value, CourierError>,
{
  fn resume(&mut self, delivery: Option<Delivery>) -> Result<Outcome, CourierError> {
    if let Some(outcome) = self.lifecycle.gate(delivery.as_ref()) {
      return Ok(outcome);
    }
    let delivery = match delivery {
      Some(delivery) if delivery.is_on(INBOX) => delivery,
      _ => return Ok(Outcome::Empty),
    };
    let result = (self.f)(delivery.message)?;
    if result.is_shutdown() {
      return Ok(self.lifecycle.finish(result));
    }
    if self.suppress_none && result.is_null() {
      return Ok(Outcome::Empty);
    }
    Ok(Outcome::produced(OUTBOX, result))
  }

  fn raise(&mut self, error: CourierError) -> Result<Outcome, CourierError> {
    self.lifecycle.raise(error)
  }

  fn close(&mut self) {
    self.lifecycle.close();
  }
}

/// Calls `f(message)` for every message received on `inbox`.
///
/// Results are dropped, except a `Shutdown`, which is emitted on `signal`.
pub struct Sink<F> {
  f: F,
  lifecycle: Lifecycle,
}

impl<F> Sink<F>
where
  F: FnMut(Value) -> Result<Value, CourierError>,
{
  pub fn new(f: F) -> Self {
    Self {
      f,
      lifecycle: Lifecycle::default(),
    }
  }
}

impl<F> ICoroutine for Sink<F>
where
  F: FnMut(Value) -> Result<Value, CourierError>,
{
  fn resume(&mut self, delivery: Option<Delivery>) -> Result<Outcome, CourierError> {
    if let Some(outcome) = self.lifecycle.gate(delivery.as_ref()) {
      return Ok(outcome);
    }
    let delivery = match delivery {
      Some(delivery) if delivery.is_on(INBOX) => delivery,
      _ => return Ok(Outcome::Empty),
    };
    let result = (self.f)(delivery.message)?;
    if result.is_shutdown() {
      return Ok(self.lifecycle.finish(result));
    }
    Ok(Outcome::Empty)
  }

  fn raise(&mut self, error: CourierError) -> Result<Outcome, CourierError> {
    self.lifecycle.raise(error)
  }

  fn close(&mut self) {
    self.lifecycle.close();
  }
}

/// Emits the next element of an iterator on `outbox` for every delivery.
///
/// Once the iterator is exhausted a `ProducerFinished` is emitted on
/// `signal` instead.
pub struct Producer<I> {
  iter: I,
  lifecycle: Lifecycle,
}

impl<I> Producer<I>
where
  I: Iterator,
  I::Item: Into<Value>,
{
  pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
    Self {
      iter: iter.into_iter(),
      lifecycle: Lifecycle::default(),
    }
  }
}

impl<I> ICoroutine for Producer<I>
where
  I: Iterator,
  I::Item: Into<Value>,
{
  fn resume(&mut self, delivery: Option<Delivery>) -> Result<Outcome, CourierError> {
    if let Some(outcome) = self.lifecycle.gate(delivery.as_ref()) {
      return Ok(outcome);
    }
    match self.iter.next() {
      Some(item) => Ok(Outcome::produced(OUTBOX, item)),
      None => Ok(self.lifecycle.finish(Message::producer_finished().into())),
    }
  }

  fn raise(&mut self, error: CourierError) -> Result<Outcome, CourierError> {
    self.lifecycle.raise(error)
  }

  fn close(&mut self) {
    self.lifecycle.close();
  }
}

/// A lazy [`NullSink`].
pub fn null_sink() -> CoroutineHandle {
  CoroutineHandle::new(NullSink::new())
}

/// A lazy [`FnCoroutine`].
pub fn from_fn<F>(f: F) -> CoroutineHandle
where
  F: FnMut(Delivery) -> Result<Outcome, CourierError> + 'static,
{
  CoroutineHandle::new(FnCoroutine::new(f))
}

/// A lazy [`Filter`] that emits `Null` results.
pub fn filter_from_fn<F>(f: F) -> CoroutineHandle
where
  F: FnMut(Value) -> Result<Value, CourierError> + 'static,
{
  CoroutineHandle::new(Filter::new(f))
}

/// A lazy [`Sink`].
pub fn sink_from_fn<F>(f: F) -> CoroutineHandle
where
  F: FnMut(Value) -> Result<Value, CourierError> + 'static,
{
  CoroutineHandle::new(Sink::new(f))
}

/// A non-lazy [`Producer`].
pub fn producer_from_iter<T>(items: T) -> CoroutineHandle
where
  T: IntoIterator,
  T::IntoIter: 'static,
  T::Item: Into<Value>,
{
  CoroutineHandle::not_lazy(Producer::new(items))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::message::MessageKind;
  use crate::ports::CONTROL;

  fn inbox(message: impl Into<Value>) -> Option<Delivery> {
    Some(Delivery::new(INBOX, message))
  }

  fn shutdown_on_control() -> Option<Delivery> {
    Some(Delivery::new(CONTROL, Message::shutdown()))
  }

  fn assert_forwards_shutdown_then_terminates(coroutine: &mut dyn ICoroutine) {
    let outcome = coroutine.resume(shutdown_on_control()).unwrap();
    assert_eq!(outcome, Outcome::produced(SIGNAL, Message::shutdown()));
    assert_eq!(coroutine.resume(inbox("after")).unwrap(), Outcome::Terminated);
    assert_eq!(coroutine.resume(inbox("again")).unwrap(), Outcome::Terminated);
  }

  #[test]
  fn null_sink_swallows_messages() {
    let mut sink = NullSink::new();
    assert_eq!(sink.resume(None).unwrap(), Outcome::Empty);
    assert_eq!(sink.resume(inbox("Hello")).unwrap(), Outcome::Empty);
    assert_forwards_shutdown_then_terminates(&mut sink);
  }

  #[test]
  fn closed_coroutines_report_termination() {
    let mut sink = NullSink::new();
    sink.close();
    sink.close();
    assert_eq!(sink.resume(inbox("Hello")).unwrap(), Outcome::Terminated);

    let mut filter = Filter::new(Ok);
    filter.close();
    assert_eq!(filter.resume(inbox("Hello")).unwrap(), Outcome::Terminated);
  }

  #[test]
  fn raise_after_close_reports_termination() {
    let injected = || CourierError::coroutine("boom");
    let mut bodies: Vec<Box<dyn ICoroutine>> = vec![
      Box::new(NullSink::new()),
      Box::new(FnCoroutine::new(|_d: Delivery| Ok(Outcome::Empty))),
      Box::new(Filter::new(Ok)),
      Box::new(Sink::new(Ok)),
      Box::new(Producer::new(vec![1i64, 2])),
    ];
    for body in bodies.iter_mut() {
      body.close();
      assert_eq!(body.raise(injected()), Ok(Outcome::Terminated));
      assert_eq!(body.raise(injected()), Ok(Outcome::Terminated));
    }
  }

  #[test]
  fn raise_while_finishing_reports_termination() {
    let mut sink = NullSink::new();
    sink.resume(shutdown_on_control()).unwrap();
    assert_eq!(sink.raise(CourierError::coroutine("late")), Ok(Outcome::Terminated));
    assert_eq!(sink.resume(inbox("after")).unwrap(), Outcome::Terminated);
  }

  #[test]
  fn raise_returns_unhandled_failures() {
    let mut filter = Filter::new(Ok);
    let err = filter.raise(CourierError::coroutine("boom")).unwrap_err();
    assert_eq!(err, CourierError::coroutine("boom"));
  }

  #[test]
  fn filter_emits_results_on_outbox() {
    let mut filter = Filter::new(|v: Value| Ok(Value::from(v.as_str().unwrap_or_default().to_uppercase())));
    filter.resume(None).unwrap();
    assert_eq!(filter.resume(inbox("hello")).unwrap(), Outcome::produced(OUTBOX, "HELLO"));
    assert_eq!(filter.resume(inbox("message 2")).unwrap(), Outcome::produced(OUTBOX, "MESSAGE 2"));
  }

  #[test]
  fn filter_ignores_other_inboxes() {
    let mut calls = 0;
    let mut filter = Filter::new(|v| {
      calls += 1;
      Ok(v)
    });
    assert_eq!(filter.resume(Some(Delivery::new(CONTROL, "Hello"))).unwrap(), Outcome::Empty);
    assert_eq!(filter.resume(Some(Delivery::new("notabox", "Hello"))).unwrap(), Outcome::Empty);
    drop(filter);
    assert_eq!(calls, 0);
  }

  #[test]
  fn filter_suppresses_nulls_only_when_asked() {
    let mut emitting = Filter::new(|_| Ok(Value::Null));
    assert_eq!(emitting.resume(inbox("x")).unwrap(), Outcome::produced(OUTBOX, Value::Null));

    let mut suppressing = Filter::new(|_| Ok(Value::Null)).suppress_none(true);
    assert_eq!(suppressing.resume(inbox("x")).unwrap(), Outcome::Empty);
  }

  #[test]
  fn filter_shuts_down_when_callable_returns_shutdown() {
    let mut filter = Filter::new(|_| Ok(Message::shutdown().into()));
    assert_eq!(filter.resume(inbox("x")).unwrap(), Outcome::produced(SIGNAL, Message::shutdown()));
    assert_eq!(filter.resume(inbox("y")).unwrap(), Outcome::Terminated);
  }

  #[test]
  fn filter_forwards_shutdown() {
    let mut filter = Filter::new(Ok);
    assert_forwards_shutdown_then_terminates(&mut filter);
  }

  #[test]
  fn sink_emits_only_shutdowns() {
    let mut seen = Vec::new();
    let mut sink = Sink::new(|v: Value| {
      seen.push(v.clone());
      Ok(v)
    });
    assert_eq!(sink.resume(inbox(1)).unwrap(), Outcome::Empty);
    assert_eq!(sink.resume(inbox(2)).unwrap(), Outcome::Empty);
    let finished = Message::producer_finished();
    assert_eq!(sink.resume(inbox(finished.clone())).unwrap(), Outcome::produced(SIGNAL, finished));
    drop(sink);
    assert_eq!(seen, vec![Value::Int(1), Value::Int(2)]);
  }

  #[test]
  fn producer_emits_items_then_producer_finished() {
    let mut producer = Producer::new(0..3i64);
    producer.resume(None).unwrap();
    for expected in 0..3i64 {
      let outcome = producer.resume(Some(Delivery::new(CONTROL, Value::Null))).unwrap();
      assert_eq!(outcome, Outcome::produced(OUTBOX, expected));
    }
    match producer.resume(Some(Delivery::new(CONTROL, Value::Null))).unwrap() {
      Outcome::Produced { outbox, message } => {
        assert_eq!(outbox, SIGNAL);
        assert_eq!(message.as_message().map(Message::kind), Some(MessageKind::ProducerFinished));
      }
      other => panic!("expected ProducerFinished, got {:?}", other),
    }
    assert_eq!(producer.resume(Some(Delivery::new(CONTROL, Value::Null))).unwrap(), Outcome::Terminated);
  }

  #[test]
  fn producer_forwards_shutdown() {
    let mut producer = Producer::new(vec!["a", "b"]);
    assert_forwards_shutdown_then_terminates(&mut producer);
  }

  #[test]
  fn fn_coroutine_stops_after_termination() {
    let mut coroutine = FnCoroutine::new(|d: Delivery| {
      if d.message.is_shutdown() {
        Ok(Outcome::Terminated)
      } else {
        Ok(Outcome::produced(OUTBOX, d.message))
      }
    });
    assert_eq!(coroutine.resume(None).unwrap(), Outcome::Empty);
    assert_eq!(coroutine.resume(inbox(5)).unwrap(), Outcome::produced(OUTBOX, 5));
    assert_eq!(coroutine.resume(shutdown_on_control()).unwrap(), Outcome::Terminated);
    assert_eq!(coroutine.resume(inbox(6)).unwrap(), Outcome::Terminated);
  }
}
