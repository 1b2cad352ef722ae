//! ItemTask - the unit of work run for one record id on a pool worker.
//!
//! # フロー
//! 1. work delay（interrupt と競合させる）
//! 2. RecordStore::get()
//! 3. 見つからなければ Absent
//! 4. status を PROCESSED にする
//! 5. RecordStore::update()
//! 6. Success(保存後の record)
//!
//! Nothing here returns an error: every failure becomes an `ItemOutcome`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{FailureReason, ItemOutcome, RecordId};
use crate::pool::Interrupt;
use crate::ports::RecordStore;

pub struct ItemTask {
    store: Arc<dyn RecordStore>,
    work_delay: Duration,
}

impl ItemTask {
    pub fn new(store: Arc<dyn RecordStore>, work_delay: Duration) -> Self {
        Self { store, work_delay }
    }

    pub async fn run(&self, id: RecordId, mut interrupt: Interrupt) -> ItemOutcome {
        if !self.work_delay.is_zero() {
            tokio::select! {
                _ = interrupt.raised() => {
                    warn!(record_id = %id, "item interrupted during work delay");
                    return ItemOutcome::Failed(FailureReason::Interrupted);
                }
                _ = tokio::time::sleep(self.work_delay) => {}
            }
        }

        let mut record = match self.store.get(id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!(record_id = %id, "record absent, skipping");
                return ItemOutcome::Absent;
            }
            Err(e) => {
                warn!(record_id = %id, error = %e, "fetch failed");
                return ItemOutcome::Failed(FailureReason::Store(e.to_string()));
            }
        };

        if !record.mark_processed() {
            debug!(record_id = %id, "record already processed");
        }

        match self.store.update(record).await {
            Ok(saved) => ItemOutcome::Success(saved),
            Err(e) => {
                warn!(record_id = %id, error = %e, "persist failed");
                ItemOutcome::Failed(FailureReason::Store(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewRecord, STATUS_PROCESSED, StoreError};
    use crate::impls::InMemoryRecordStore;
    use crate::impls::scripted_store::ScriptedStore;

    async fn store_with(n: usize) -> Arc<InMemoryRecordStore> {
        let drafts =
            (1..=n).map(|i| NewRecord::new(format!("item-{i}"), "desc", "owner@example.com"));
        Arc::new(InMemoryRecordStore::seeded(drafts).await)
    }

    #[tokio::test]
    async fn present_record_is_processed_and_persisted() {
        let store = store_with(1).await;
        let task = ItemTask::new(store.clone(), Duration::ZERO);

        let outcome = task.run(RecordId::new(1), Interrupt::detached()).await;

        let ItemOutcome::Success(record) = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(record.status, STATUS_PROCESSED);

        let stored = store.get(RecordId::new(1)).await.unwrap().unwrap();
        assert_eq!(stored.status, STATUS_PROCESSED);
    }

    #[tokio::test]
    async fn missing_record_is_absent() {
        let task = ItemTask::new(store_with(1).await, Duration::ZERO);
        let outcome = task.run(RecordId::new(2), Interrupt::detached()).await;
        assert_eq!(outcome, ItemOutcome::Absent);
    }

    #[tokio::test]
    async fn already_processed_record_stays_processed() {
        let store = store_with(1).await;
        let task = ItemTask::new(store.clone(), Duration::ZERO);

        task.run(RecordId::new(1), Interrupt::detached()).await;
        let second = task.run(RecordId::new(1), Interrupt::detached()).await;

        let record = second.into_success().unwrap();
        assert_eq!(record.status, STATUS_PROCESSED);
    }

    #[tokio::test]
    async fn store_errors_become_failed_outcomes() {
        let inner = store_with(2).await;
        let store = ScriptedStore::new(inner)
            .failing_get(RecordId::new(1))
            .failing_update(RecordId::new(2));
        let task = ItemTask::new(Arc::new(store), Duration::ZERO);

        let fetch = task.run(RecordId::new(1), Interrupt::detached()).await;
        let persist = task.run(RecordId::new(2), Interrupt::detached()).await;

        let unavailable = StoreError::Unavailable("scripted failure".into()).to_string();
        assert_eq!(
            fetch,
            ItemOutcome::Failed(FailureReason::Store(unavailable.clone()))
        );
        assert_eq!(
            persist,
            ItemOutcome::Failed(FailureReason::Store(unavailable))
        );
    }

    #[tokio::test]
    async fn raised_interrupt_stops_the_delay() {
        let (tx, rx) = tokio::sync::watch::channel(false);
        let interrupt = Interrupt::new(rx);
        let store = store_with(1).await;
        let task = ItemTask::new(store.clone(), Duration::from_secs(30));

        tx.send_replace(true);
        let outcome = task.run(RecordId::new(1), interrupt).await;

        assert_eq!(outcome, ItemOutcome::Failed(FailureReason::Interrupted));
        // nothing was written
        let stored = store.get(RecordId::new(1)).await.unwrap().unwrap();
        assert!(!stored.is_processed());
    }
}
