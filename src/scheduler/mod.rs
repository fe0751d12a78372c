// src/scheduler/mod.rs

//! The cooperative scheduler: run queue, message pumping and the shutdown cascade.

mod core;
mod step;

pub use self::core::Scheduler;
