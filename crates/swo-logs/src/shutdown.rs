//! Cancellation handle shared between the signal listener and the query loop.

use tokio::sync::watch;

/// Fires a [`Shutdown`] once. Dropping the trigger without firing leaves
/// every handle pending forever.
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Create a trigger together with its first handle.
    pub fn new() -> (Self, Shutdown) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, Shutdown { rx })
    }

    pub fn trigger(&self) {
        // send_replace never fails, even with no live receivers.
        self.tx.send_replace(true);
    }

    pub fn subscribe(&self) -> Shutdown {
        Shutdown {
            rx: self.tx.subscribe(),
        }
    }
}

/// Receiving side of a shutdown signal.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// A handle that is never cancelled.
    pub fn never() -> Self {
        let (_, shutdown) = ShutdownTrigger::new();
        shutdown
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the trigger fires. Cancel-safe.
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn trigger_wakes_every_handle() {
        let (trigger, mut first) = ShutdownTrigger::new();
        let mut second = trigger.subscribe();
        assert!(!first.is_cancelled());

        trigger.trigger();
        first.cancelled().await;
        second.cancelled().await;
        assert!(first.is_cancelled());
    }

    #[tokio::test]
    async fn triggered_before_wait_resolves_immediately() {
        let (trigger, mut shutdown) = ShutdownTrigger::new();
        trigger.trigger();
        tokio::time::timeout(Duration::from_millis(100), shutdown.cancelled())
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn never_stays_pending() {
        let mut shutdown = Shutdown::never();
        let res = tokio::time::timeout(Duration::from_secs(60), shutdown.cancelled()).await;
        assert!(res.is_err());
        assert!(!shutdown.is_cancelled());
    }
}
