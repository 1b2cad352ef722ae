//! Errors - エラー型と分類
//!
//! Per-item failures (`StoreError` raised inside an item task) never leave
//! the task: they become `ItemOutcome::Failed`. Only pool-level conditions
//! reach the caller of `process_all`, as `DispatchError`.

use thiserror::Error;

use super::{PoolState, RecordId};

/// Error raised by a `RecordStore` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(RecordId),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Error raised by the worker pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Submission while the pool is not running (PoolExhaustion/Rejection).
    #[error("worker pool rejected submission: pool is {state}")]
    Rejected { state: PoolState },

    #[error("invalid worker pool transition: {from} -> {to}")]
    InvalidTransition { from: PoolState, to: PoolState },
}

/// Error surfaced to the caller of `BatchProcessor::process_all`.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// The pool refused an item after earlier items of the same batch were
    /// accepted. The accepted ones still run and persist.
    #[error("batch cut short after {accepted} of {total} items: {source}")]
    CutShort {
        accepted: usize,
        total: usize,
        source: PoolError,
    },

    /// Listing the batch failed before anything was submitted.
    #[error("failed to list record ids: {0}")]
    Store(#[from] StoreError),

    /// The aggregation step itself did not run to completion.
    #[error("batch aggregation did not complete: {0}")]
    Join(String),
}

/// Error returned by the `RecordService` façade.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("record not found: {0}")]
    NotFound(RecordId),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
