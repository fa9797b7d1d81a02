use crate::{ConnectionId, Result};

use axum::extract::ws::Utf8Bytes;

/// Outbound side of one connection, as seen by the dispatch loop.
///
/// Once registered, a handle is owned by the registry. `push` must not block:
/// the dispatch loop calls it for every recipient of every broadcast.
pub trait ConnectionHandle: Send + 'static {
    fn connection_id(&self) -> ConnectionId;

    /// Queue a text payload for delivery.
    fn push(&self, payload: &Utf8Bytes) -> Result<()>;

    /// Send a close notice if possible, then release the connection.
    fn close(self);
}
