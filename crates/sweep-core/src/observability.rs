//! Observability: per-batch counters and tracing setup.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::domain::OutcomeKind;

/// Outcome counts of one batch. Logged when the batch completes; the caller
/// only ever receives the successes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchCounts {
    pub succeeded: usize,
    pub absent: usize,
    pub failed: usize,
}

impl BatchCounts {
    pub fn record(&mut self, kind: OutcomeKind) {
        match kind {
            OutcomeKind::Success => self.succeeded += 1,
            OutcomeKind::Absent => self.absent += 1,
            OutcomeKind::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.absent + self.failed
    }
}

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .try_init();

    if installed.is_err() {
        tracing::debug!("global tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_kind() {
        let mut counts = BatchCounts::default();
        counts.record(OutcomeKind::Success);
        counts.record(OutcomeKind::Success);
        counts.record(OutcomeKind::Absent);
        counts.record(OutcomeKind::Failed);

        assert_eq!(
            counts,
            BatchCounts {
                succeeded: 2,
                absent: 1,
                failed: 1,
            }
        );
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn init_tracing_twice_is_harmless() {
        init_tracing();
        init_tracing();
    }
}
