use crate::{ConnectionHandle, ConnectionId, Result, WsError};

use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, close_code};
use log::debug;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot;

/// Connection handle backed by a bounded frame queue.
///
/// The receiving end is drained by the connection's writer task, which owns
/// the socket sink. Dropping the handle closes the queue, so the writer
/// flushes what is left and closes the socket. It also resolves the
/// session's `ReleaseSignal`, so the session stops reading.
#[derive(Debug)]
pub struct OutboundHandle {
    connection_id: ConnectionId,
    sender: mpsc::Sender<Message>,
    _released: oneshot::Sender<()>,
}

/// Resolves once the registry has let go of the session's handle.
#[derive(Debug)]
pub struct ReleaseSignal {
    receiver: oneshot::Receiver<()>,
}

impl ReleaseSignal {
    /// Wait until the handle is closed or dropped. Only await to completion once.
    pub async fn released(&mut self) {
        // The sender is never used; only its drop matters
        let _ = (&mut self.receiver).await;
    }

    /// Non-blocking check
    pub fn is_released(&mut self) -> bool {
        matches!(
            self.receiver.try_recv(),
            Err(oneshot::error::TryRecvError::Closed)
        )
    }
}

impl OutboundHandle {
    /// Create a handle, the frame queue its writer drains, and the signal the
    /// session watches for release.
    pub fn channel(
        connection_id: ConnectionId,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<Message>, ReleaseSignal) {
        let (sender, frames) = mpsc::channel(capacity.max(1));
        let (released_tx, released_rx) = oneshot::channel();
        (
            Self {
                connection_id,
                sender,
                _released: released_tx,
            },
            frames,
            ReleaseSignal {
                receiver: released_rx,
            },
        )
    }
}

impl ConnectionHandle for OutboundHandle {
    fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    fn push(&self, payload: &Utf8Bytes) -> Result<()> {
        self.sender
            .try_send(Message::Text(payload.clone()))
            .map_err(|e| match e {
                TrySendError::Full(_) => WsError::send_buffer_full(),
                TrySendError::Closed(_) => WsError::connection_closed(format!(
                    "writer for connection {} has stopped",
                    self.connection_id
                )),
            })
    }

    fn close(self) {
        let frame = CloseFrame {
            code: close_code::NORMAL,
            reason: Utf8Bytes::from("connection released"),
        };

        // Best effort: a full or closed queue just skips the notice
        if self.sender.try_send(Message::Close(Some(frame))).is_err() {
            debug!(
                "Close notice for connection {} not queued",
                self.connection_id
            );
        }
    }
}
