//! Dispatch Pool
//!
//! Bounded-concurrency front door for analysis jobs. At most `capacity`
//! analyses run at once; further jobs wait in FIFO order for a slot.
//! Concurrent submissions for the same identifier coalesce onto a single
//! job, and every submitter observes the same Record.

pub(crate) mod dispatch;
pub(crate) mod error;

pub mod api;
