//! Outcome model: what a single item task reports back to its batch.
//!
//! Outcomes never cross the public boundary one by one. The dispatcher
//! reads them after the completion barrier, keeps the successes and only
//! counts the rest.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Record;

/// Classification of an item outcome (used for counters and logs).
///
/// Serialized as SCREAMING_SNAKE_CASE: SUCCESS / ABSENT / FAILED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    Success,
    Absent,
    Failed,
}

/// Why an item failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail")]
pub enum FailureReason {
    /// The store raised an error while fetching or persisting.
    Store(String),

    /// The worker was told to stop while the item was waiting.
    Interrupted,

    /// The item's result slot was dropped without a value
    /// (the task panicked or the pool went away before running it).
    Lost,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Store(msg) => write!(f, "store failure: {msg}"),
            FailureReason::Interrupted => f.write_str("interrupted"),
            FailureReason::Lost => f.write_str("result lost"),
        }
    }
}

/// Per-identifier result of one item task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Success(Record),
    /// The id no longer resolves to a record. Not an error.
    Absent,
    Failed(FailureReason),
}

impl ItemOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            ItemOutcome::Success(_) => OutcomeKind::Success,
            ItemOutcome::Absent => OutcomeKind::Absent,
            ItemOutcome::Failed(_) => OutcomeKind::Failed,
        }
    }

    /// The record, if this outcome is a success.
    pub fn into_success(self) -> Option<Record> {
        match self {
            ItemOutcome::Success(record) => Some(record),
            _ => None,
        }
    }
}
