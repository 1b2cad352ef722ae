//! Worker loop: pull a job, run it, repeat until the queue closes.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, warn};

use super::Job;
use super::interrupt::Interrupt;

pub(super) type JobReceiver = Arc<Mutex<mpsc::UnboundedReceiver<Job>>>;

pub(super) async fn worker_loop(worker_id: usize, jobs: JobReceiver, mut interrupt: Interrupt) {
    debug!(worker_id, "worker started");

    loop {
        // interrupt が来ていたら queue に残っている job も取らない
        if interrupt.is_raised() {
            break;
        }

        let job = tokio::select! {
            _ = interrupt.raised() => break,
            job = next_job(&jobs) => job,
        };

        // None: queue が閉じられ、かつ空になった（graceful shutdown）
        let Some(job) = job else {
            break;
        };

        let signal = interrupt.clone();
        let result = AssertUnwindSafe(async move { job(signal).await })
            .catch_unwind()
            .await;

        match result {
            Ok(Ok(())) => {}
            Ok(Err(_interrupted)) => {
                warn!(worker_id, "job interrupted, worker stopping");
                break;
            }
            Err(panic) => {
                // the job's result slot was dropped during unwinding; the
                // batch sees it as a lost item
                error!(
                    worker_id,
                    panic = %panic_message(panic.as_ref()),
                    "job panicked, worker continues"
                );
            }
        }
    }

    debug!(worker_id, "worker stopped");
}

/// Take the next job. The receiver lock is released before the job runs.
async fn next_job(jobs: &JobReceiver) -> Option<Job> {
    let mut rx = jobs.lock().await;
    rx.recv().await
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_message_reads_common_payloads() {
        let p: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(p.as_ref()), "boom");

        let p: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(p.as_ref()), "bang");

        let p: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(p.as_ref()), "non-string panic payload");
    }
}
