use crate::ShutdownCoordinator;

use tokio::sync::watch;

/// Per-task view of the shutdown signal
pub struct ShutdownGuard {
    shutdown_rx: watch::Receiver<bool>,
}

impl ShutdownGuard {
    pub fn new(coordinator: &ShutdownCoordinator) -> Self {
        Self {
            shutdown_rx: coordinator.subscribe(),
        }
    }

    /// Wait for the shutdown signal. Cancel safe.
    pub async fn wait(&mut self) {
        if self.shutdown_rx.wait_for(|stopped| *stopped).await.is_err() {
            // Coordinator dropped without signalling: nothing can stop us now
            std::future::pending::<()>().await;
        }
    }

    /// Non-blocking check
    pub fn poll_shutdown(&self) -> bool {
        *self.shutdown_rx.borrow()
    }
}
