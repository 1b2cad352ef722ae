//! Worker pool lifecycle state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// PoolState is the lifecycle of the process-wide worker pool.
///
/// State transitions:
/// - Uninitialized -> Running (start)
/// - Running -> ShuttingDown (stop signal: no new submissions, in-flight work drains)
/// - ShuttingDown -> Terminated (all workers returned, or forced after the timeout)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolState {
    Uninitialized,
    Running,
    ShuttingDown,
    Terminated,
}

impl PoolState {
    /// Submissions are only valid while running.
    pub fn accepts_submissions(self) -> bool {
        matches!(self, PoolState::Running)
    }
}

impl fmt::Display for PoolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PoolState::Uninitialized => "uninitialized",
            PoolState::Running => "running",
            PoolState::ShuttingDown => "shutting_down",
            PoolState::Terminated => "terminated",
        };
        f.write_str(s)
    }
}
