//! BatchProcessor - submits one item task per record id and joins them.
//!
//! Every task writes into its own oneshot slot. One continuation, spawned
//! on the runtime, waits for all slots at once and only then reads them,
//! so the aggregation never races with a task that is still writing.
//! Overlapping `process_all` calls each own their slots and never see each
//! other's outcomes.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::app::item_task::ItemTask;
use crate::domain::{DispatchError, FailureReason, ItemOutcome, PoolError, Record, RecordId};
use crate::observability::BatchCounts;
use crate::pool::{Interrupted, WorkerPool};
use crate::ports::RecordStore;

type Slot = (RecordId, oneshot::Receiver<ItemOutcome>);

pub struct BatchProcessor {
    store: Arc<dyn RecordStore>,
    pool: Arc<WorkerPool>,
    task: Arc<ItemTask>,
}

impl BatchProcessor {
    pub fn new(store: Arc<dyn RecordStore>, pool: Arc<WorkerPool>, work_delay: Duration) -> Self {
        let task = Arc::new(ItemTask::new(Arc::clone(&store), work_delay));
        Self { store, pool, task }
    }

    /// Start one batch over every id currently in the store.
    ///
    /// Returns as soon as every item is queued. Await the handle for the
    /// processed records. Fails only if the ids cannot be listed or the
    /// pool refuses a submission.
    ///
    /// If the pool stops accepting partway through, the items already
    /// accepted still run. Their outcomes are collected and logged in the
    /// background and the call fails with `DispatchError::CutShort`.
    pub async fn process_all(&self) -> Result<BatchHandle, DispatchError> {
        let ids = self.store.list_ids().await?;
        let batch_size = ids.len();

        if ids.is_empty() {
            debug!("no records to process");
            return Ok(BatchHandle::ready(Vec::new()));
        }

        let mut slots: Vec<Slot> = Vec::with_capacity(batch_size);
        for id in ids {
            let (tx, rx) = oneshot::channel();
            let task = Arc::clone(&self.task);

            let submitted = self.pool.submit(move |interrupt| async move {
                let outcome = task.run(id, interrupt).await;
                let interrupted =
                    matches!(outcome, ItemOutcome::Failed(FailureReason::Interrupted));

                // the receiver is gone only if the batch itself was dropped
                let _ = tx.send(outcome);

                if interrupted { Err(Interrupted) } else { Ok(()) }
            });

            if let Err(source) = submitted {
                return Err(cut_short(slots, batch_size, source));
            }
            slots.push((id, rx));
        }

        debug!(batch_size, "batch submitted");

        let join = tokio::spawn(collect(slots).instrument(info_span!("batch", batch_size)));
        Ok(BatchHandle::spawned(join))
    }
}

/// The pool refused a submission mid-batch. Whatever was accepted is still
/// collected so its outcomes get logged.
fn cut_short(slots: Vec<Slot>, batch_size: usize, source: PoolError) -> DispatchError {
    let accepted = slots.len();
    if accepted == 0 {
        return DispatchError::Pool(source);
    }

    warn!(accepted, batch_size, error = %source, "pool refused the rest of the batch");
    tokio::spawn(collect(slots).instrument(info_span!("batch", batch_size = accepted, cut_short = true)));

    DispatchError::CutShort {
        accepted,
        total: batch_size,
        source,
    }
}

/// Wait for every slot, then keep the successes.
async fn collect(slots: Vec<Slot>) -> Vec<Record> {
    let (ids, receivers): (Vec<RecordId>, Vec<_>) = slots.into_iter().unzip();
    let outcomes = join_all(receivers).await;

    let mut counts = BatchCounts::default();
    let mut processed = Vec::with_capacity(outcomes.len());

    for (id, slot) in ids.into_iter().zip(outcomes) {
        // a dropped sender means the task never reported
        let outcome = slot.unwrap_or(ItemOutcome::Failed(FailureReason::Lost));
        counts.record(outcome.kind());

        match outcome {
            ItemOutcome::Success(record) => processed.push(record),
            ItemOutcome::Absent => {}
            ItemOutcome::Failed(reason) => {
                warn!(record_id = %id, %reason, "item failed");
            }
        }
    }

    info!(
        succeeded = counts.succeeded,
        absent = counts.absent,
        failed = counts.failed,
        "batch complete"
    );
    processed
}

enum HandleState {
    Ready(Option<Vec<Record>>),
    Spawned(JoinHandle<Vec<Record>>),
}

/// Resolves to the processed records of one batch.
///
/// Dropping the handle does not cancel the batch; its items still run and
/// persist.
pub struct BatchHandle {
    state: HandleState,
}

impl BatchHandle {
    fn ready(records: Vec<Record>) -> Self {
        Self {
            state: HandleState::Ready(Some(records)),
        }
    }

    fn spawned(join: JoinHandle<Vec<Record>>) -> Self {
        Self {
            state: HandleState::Spawned(join),
        }
    }

    /// Has the batch finished (without waiting)?
    pub fn is_finished(&self) -> bool {
        match &self.state {
            HandleState::Ready(_) => true,
            HandleState::Spawned(join) => join.is_finished(),
        }
    }
}

impl Future for BatchHandle {
    type Output = Result<Vec<Record>, DispatchError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            HandleState::Ready(records) => Poll::Ready(Ok(records.take().unwrap_or_default())),
            HandleState::Spawned(join) => Pin::new(join)
                .poll(cx)
                .map(|joined| joined.map_err(|e| DispatchError::Join(e.to_string()))),
        }
    }
}
