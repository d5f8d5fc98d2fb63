//! Append-only log of messages that did not produce a record.

mod sink;

pub use sink::{FailureReason, FailureRecord, FailureSink, MessageOrigin, PartialRecord};
