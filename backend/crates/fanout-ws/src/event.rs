use crate::{ConnectionId, SessionIdentity};

use axum::extract::ws::Utf8Bytes;

/// A session joining its group. Carries the handle the registry will own.
pub struct Registration<H> {
    pub identity: SessionIdentity,
    pub handle: H,
}

/// A session leaving. Only removes the entry if it still belongs to
/// `connection_id`, so a superseded session cannot evict its replacement.
#[derive(Debug, Clone)]
pub struct Unregistration {
    pub identity: SessionIdentity,
    pub connection_id: ConnectionId,
}

/// A text payload to fan out to the rest of the origin's group.
#[derive(Debug, Clone)]
pub struct BroadcastRequest {
    pub payload: Utf8Bytes,
    pub origin: SessionIdentity,
}

/// Everything the dispatch loop consumes, one at a time.
pub enum Event<H> {
    Register(Registration<H>),
    Unregister(Unregistration),
    Broadcast(BroadcastRequest),
}
