//! Worker pool: a fixed number of long-lived workers sharing one job queue.
//!
//! The pool is process-wide state owned by the service. It is created once,
//! started once and shut down once:
//!
//! - `new()` -> Uninitialized
//! - `start()` -> Running: spawns `worker_threads` workers on the tokio runtime
//! - `shutdown()` -> ShuttingDown: the queue is closed, already accepted jobs
//!   (queued or running) are drained
//! - -> Terminated once every worker returned. If the optional timeout runs
//!   out first, the interrupt is raised and whatever is still running after
//!   a short grace period is aborted.
//!
//! At most `worker_threads` jobs run at the same time.

mod interrupt;
mod worker;

pub use self::interrupt::{Interrupt, Interrupted};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::domain::{PoolError, PoolState};

use self::worker::worker_loop;

/// How long interrupted jobs get to return before their workers are aborted.
const INTERRUPT_GRACE: Duration = Duration::from_millis(500);

pub(crate) type JobFuture = Pin<Box<dyn Future<Output = Result<(), Interrupted>> + Send>>;
pub(crate) type Job = Box<dyn FnOnce(Interrupt) -> JobFuture + Send>;

/// Result of a completed shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// The timeout ran out and running jobs were interrupted.
    pub forced: bool,
}

struct PoolInner {
    state: PoolState,
    /// Dropping the only sender closes the queue.
    sender: Option<mpsc::UnboundedSender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

pub struct WorkerPool {
    worker_threads: usize,
    inner: Mutex<PoolInner>,
    interrupt_tx: watch::Sender<bool>,
}

impl WorkerPool {
    /// Create an uninitialized pool. `worker_threads` is clamped to at least 1.
    pub fn new(worker_threads: usize) -> Self {
        let (interrupt_tx, _rx) = watch::channel(false);
        Self {
            worker_threads: worker_threads.max(1),
            inner: Mutex::new(PoolInner {
                state: PoolState::Uninitialized,
                sender: None,
                workers: Vec::new(),
            }),
            interrupt_tx,
        }
    }

    /// Create and start a pool in one go.
    pub fn started(worker_threads: usize) -> Result<Arc<Self>, PoolError> {
        let pool = Arc::new(Self::new(worker_threads));
        pool.start()?;
        Ok(pool)
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    pub fn state(&self) -> PoolState {
        self.inner.lock().state
    }

    /// Spawn the workers. Must be called from within a tokio runtime.
    pub fn start(&self) -> Result<(), PoolError> {
        let mut inner = self.inner.lock();
        if inner.state != PoolState::Uninitialized {
            return Err(PoolError::InvalidTransition {
                from: inner.state,
                to: PoolState::Running,
            });
        }

        let (tx, rx) = mpsc::unbounded_channel::<Job>();
        let rx = Arc::new(tokio::sync::Mutex::new(rx));

        let mut workers = Vec::with_capacity(self.worker_threads);
        for worker_id in 0..self.worker_threads {
            let jobs = Arc::clone(&rx);
            let interrupt = Interrupt::new(self.interrupt_tx.subscribe());
            workers.push(tokio::spawn(worker_loop(worker_id, jobs, interrupt)));
        }

        inner.sender = Some(tx);
        inner.workers = workers;
        inner.state = PoolState::Running;

        info!(worker_threads = self.worker_threads, "worker pool started");
        Ok(())
    }

    /// Queue one job. Fails unless the pool is running.
    ///
    /// The job receives the pool's `Interrupt` and must return `Interrupted`
    /// if it stopped because of it.
    pub fn submit<F, Fut>(&self, job: F) -> Result<(), PoolError>
    where
        F: FnOnce(Interrupt) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), Interrupted>> + Send + 'static,
    {
        let job: Job = Box::new(move |interrupt| -> JobFuture { Box::pin(job(interrupt)) });

        // state check and send happen under the same lock as shutdown's
        // close, so a job is either drained or rejected, never stranded
        let inner = self.inner.lock();
        if !inner.state.accepts_submissions() {
            return Err(PoolError::Rejected { state: inner.state });
        }
        let Some(sender) = inner.sender.as_ref() else {
            return Err(PoolError::Rejected { state: inner.state });
        };
        sender
            .send(job)
            .map_err(|_| PoolError::Rejected { state: inner.state })
    }

    /// Stop accepting jobs, drain what was accepted, and wait for the workers.
    ///
    /// With `timeout = None` this waits as long as the queued work takes.
    pub async fn shutdown(&self, timeout: Option<Duration>) -> Result<ShutdownReport, PoolError> {
        let workers = {
            let mut inner = self.inner.lock();
            if inner.state != PoolState::Running {
                return Err(PoolError::InvalidTransition {
                    from: inner.state,
                    to: PoolState::ShuttingDown,
                });
            }
            inner.state = PoolState::ShuttingDown;
            inner.sender = None;
            std::mem::take(&mut inner.workers)
        };

        info!(workers = workers.len(), ?timeout, "worker pool shutting down");

        let aborts: Vec<_> = workers.iter().map(|w| w.abort_handle()).collect();
        let mut all = Box::pin(join_all(workers));

        let forced = match timeout {
            None => {
                log_worker_exits(all.await);
                false
            }
            Some(limit) => match tokio::time::timeout(limit, &mut all).await {
                Ok(exits) => {
                    log_worker_exits(exits);
                    false
                }
                Err(_) => {
                    warn!(?limit, "shutdown timed out, interrupting running jobs");
                    self.interrupt_tx.send_replace(true);

                    if tokio::time::timeout(INTERRUPT_GRACE, &mut all).await.is_err() {
                        warn!("workers still busy after interrupt, aborting");
                        for abort in &aborts {
                            abort.abort();
                        }
                        // aborted workers finish with a cancelled JoinError
                        let _ = all.await;
                    }
                    true
                }
            },
        };

        self.inner.lock().state = PoolState::Terminated;
        info!(forced, "worker pool terminated");

        Ok(ShutdownReport { forced })
    }
}

fn log_worker_exits(exits: Vec<Result<(), tokio::task::JoinError>>) {
    for (worker_id, exit) in exits.into_iter().enumerate() {
        if let Err(e) = exit {
            error!(worker_id, error = %e, "worker exited abnormally");
        }
    }
}
