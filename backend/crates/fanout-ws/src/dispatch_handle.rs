use crate::{
    BroadcastRequest, ConnectionHandle, Registration, RegistrationGuard, RegistryStats, Result,
    SessionIdentity, Unregistration, WsError,
};

use axum::extract::ws::Utf8Bytes;
use tokio::sync::{mpsc, watch};

/// Sending side of the dispatch loop's three event queues.
///
/// Cheap to clone; sessions hold one each. Nothing here touches the registry.
pub struct DispatchHandle<H> {
    pub(crate) register_tx: mpsc::UnboundedSender<Registration<H>>,
    pub(crate) unregister_tx: mpsc::UnboundedSender<Unregistration>,
    pub(crate) broadcast_tx: mpsc::Sender<BroadcastRequest>,
    pub(crate) stats_rx: watch::Receiver<RegistryStats>,
}

impl<H: ConnectionHandle> DispatchHandle<H> {
    /// Hand `handle` over to the registry under `identity`.
    ///
    /// The returned guard unregisters when dropped.
    pub fn register(&self, identity: SessionIdentity, handle: H) -> Result<RegistrationGuard> {
        let connection_id = handle.connection_id();

        self.register_tx
            .send(Registration {
                identity: identity.clone(),
                handle,
            })
            .map_err(|_| WsError::dispatcher_unavailable())?;

        Ok(RegistrationGuard::new(
            identity,
            connection_id,
            self.unregister_tx.clone(),
        ))
    }

    /// Queue a payload for fan-out to the rest of `origin`'s group.
    /// Waits while the broadcast queue is full.
    pub async fn broadcast(&self, origin: &SessionIdentity, payload: Utf8Bytes) -> Result<()> {
        self.broadcast_tx
            .send(BroadcastRequest {
                payload,
                origin: origin.clone(),
            })
            .await
            .map_err(|_| WsError::dispatcher_unavailable())
    }

    /// Registry size as of the last processed event
    pub fn stats(&self) -> RegistryStats {
        *self.stats_rx.borrow()
    }

    pub fn subscribe_stats(&self) -> watch::Receiver<RegistryStats> {
        self.stats_rx.clone()
    }
}

impl<H> Clone for DispatchHandle<H> {
    fn clone(&self) -> Self {
        Self {
            register_tx: self.register_tx.clone(),
            unregister_tx: self.unregister_tx.clone(),
            broadcast_tx: self.broadcast_tx.clone(),
            stats_rx: self.stats_rx.clone(),
        }
    }
}
