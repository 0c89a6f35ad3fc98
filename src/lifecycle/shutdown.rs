//! Stop signal for the running engine.
//!
//! Whichever engine is configured holds the only receiver. The signal
//! handler, or a test harness, calls [`Shutdown::trigger`]; axum then stops
//! via `with_graceful_shutdown` and the hyper accept loop breaks and drains.

use tokio::sync::broadcast;

/// One-shot stop signal fanned out over a broadcast channel.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Capacity 1: only the first trigger matters.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver to hand to [`HttpServer::run`](crate::HttpServer::run).
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask the engine to stop. A no-op once the engine has already exited.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Zero once the engine has returned and dropped its receiver.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
