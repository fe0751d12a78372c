// src/ports.rs

//! Well-known port names shared by the scheduler and the built-in coroutines.

/// Default inbox for regular data messages.
pub const INBOX: &str = "inbox";
/// Default outbox for regular data messages.
pub const OUTBOX: &str = "outbox";
/// Inbox on which the scheduler delivers `Shutdown` and the synthetic idle tick.
pub const CONTROL: &str = "control";
/// Outbox on which a coroutine announces its own shutdown.
pub const SIGNAL: &str = "signal";
