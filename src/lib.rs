// src/lib.rs

//! courier - a single-threaded cooperative coroutine scheduler coupled to a
//! message-routing post office.
//!
//! Coroutines talk to each other only by emitting messages on named outboxes.
//! The [`PostOffice`] routes each message to the inboxes linked to that outbox,
//! and the [`Scheduler`] feeds queued messages to one coroutine per step.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use courier::coroutine::{producer_from_iter, sink_from_fn};
//! use courier::{easy_link, IPostOffice, PostOffice, Scheduler, Value};
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let sink_log = log.clone();
//! let producer = producer_from_iter(vec![1, 2, 3]);
//! let consumer = sink_from_fn(move |value| {
//!   sink_log.borrow_mut().push(value);
//!   Ok(Value::Null)
//! });
//!
//! let mut scheduler = Scheduler::new(PostOffice::new());
//! let coroutines = [producer, consumer];
//! scheduler.post_office_mut().register(&easy_link(&coroutines)).unwrap();
//! scheduler.register(&coroutines).unwrap();
//! scheduler.run(None).unwrap();
//!
//! assert_eq!(*log.borrow(), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
//! assert!(scheduler.is_empty());
//! ```

/// Bundles coroutines and links into pipelines.
pub mod container;
/// The coroutine contract, registration handles and built-in coroutines.
pub mod coroutine;
/// Defines the error type used throughout the library.
pub mod error;
/// Message kinds, messages and payload values.
pub mod message;
/// Construction-time leniency options.
pub mod options;
/// Well-known port names.
pub mod ports;
/// Link registry and mailboxes.
pub mod post_office;
/// The cooperative scheduler.
pub mod scheduler;

// Re-export core types for user convenience, making them accessible directly
// from the crate root (e.g., `courier::Scheduler`, `courier::Link`).
pub use container::{easy_link, Container};
pub use coroutine::{CoroutineHandle, CoroutineId, Delivery, ICoroutine, Outcome};
pub use error::CourierError;
pub use message::{Message, MessageKind, Value};
pub use options::{PostOfficeOptions, SchedulerOptions};
pub use post_office::{IPostOffice, Link, Port, PostOffice};
pub use scheduler::Scheduler;
