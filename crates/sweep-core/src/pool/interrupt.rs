//! Interrupt signal handed to every job the pool runs.

use tokio::sync::watch;

/// Returned by a job that stopped because the pool interrupted it.
///
/// The worker loop treats this as "stop this worker", so a job must hand it
/// back instead of swallowing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("interrupted by worker pool shutdown")]
pub struct Interrupted;

/// Receiving side of the pool's forced-stop broadcast.
#[derive(Debug, Clone)]
pub struct Interrupt {
    rx: watch::Receiver<bool>,
}

impl Interrupt {
    pub(crate) fn new(rx: watch::Receiver<bool>) -> Self {
        Self { rx }
    }

    /// An interrupt that is never raised (jobs run outside a pool).
    pub fn detached() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_raised(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the interrupt is raised. Never resolves if the
    /// sending side went away without raising it.
    pub async fn raised(&mut self) {
        if self.rx.wait_for(|raised| *raised).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn detached_interrupt_never_fires() {
        let mut interrupt = Interrupt::detached();
        assert!(!interrupt.is_raised());

        let waited =
            tokio::time::timeout(Duration::from_millis(20), interrupt.raised()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn raising_wakes_waiters() {
        let (tx, rx) = watch::channel(false);
        let mut interrupt = Interrupt::new(rx);

        let waiter = tokio::spawn(async move {
            interrupt.raised().await;
            interrupt.is_raised()
        });

        tx.send_replace(true);
        assert!(waiter.await.unwrap());
    }
}
