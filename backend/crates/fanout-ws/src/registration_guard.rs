use crate::{ConnectionId, SessionIdentity, Unregistration};

use log::debug;
use tokio::sync::mpsc;

/// Proof that a session is registered.
///
/// Dropping the guard emits the session's one and only unregister event, so
/// every exit path of a session (error, close, panic) unregisters exactly once.
pub struct RegistrationGuard {
    identity: SessionIdentity,
    connection_id: ConnectionId,
    unregister_tx: mpsc::UnboundedSender<Unregistration>,
}

impl RegistrationGuard {
    pub(crate) fn new(
        identity: SessionIdentity,
        connection_id: ConnectionId,
        unregister_tx: mpsc::UnboundedSender<Unregistration>,
    ) -> Self {
        Self {
            identity,
            connection_id,
            unregister_tx,
        }
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        let event = Unregistration {
            identity: std::mem::take(&mut self.identity),
            connection_id: self.connection_id,
        };

        if let Err(e) = self.unregister_tx.send(event) {
            debug!(
                "Dispatch loop gone, dropping unregister for {} ({})",
                e.0.identity, self.connection_id
            );
        }
    }
}
