use crate::{
    ConnectionConfig, ConnectionId, DispatchHandle, Metrics, OutboundHandle, ReleaseSignal,
    Result, SessionIdentity, ShutdownGuard, WsError,
};

use std::ops::ControlFlow;
use std::panic::Location;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use error_location::ErrorLocation;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

/// How long a finished session waits for its writer before aborting it
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Manages a single WebSocket connection.
///
/// The read side stays here and turns text frames into broadcast requests.
/// The write side is handed to the dispatch loop as an `OutboundHandle`
/// and drained by a writer task this session never writes to again.
pub struct WebSocketConnection {
    connection_id: ConnectionId,
    identity: SessionIdentity,
    config: ConnectionConfig,
    metrics: Metrics,
    dispatch: DispatchHandle<OutboundHandle>,
}

impl WebSocketConnection {
    pub fn new(
        connection_id: ConnectionId,
        identity: SessionIdentity,
        config: ConnectionConfig,
        metrics: Metrics,
        dispatch: DispatchHandle<OutboundHandle>,
    ) -> Self {
        Self {
            connection_id,
            identity,
            config,
            metrics,
            dispatch,
        }
    }

    /// Handle the WebSocket connection lifecycle
    pub async fn handle(self, socket: WebSocket, mut shutdown_guard: ShutdownGuard) -> Result<()> {
        log::info!(
            "WebSocket connection {} established for {}",
            self.connection_id,
            self.identity
        );

        self.metrics.connection_established();

        let (ws_sender, mut ws_receiver) = socket.split();

        // Bounded outbound queue; a full queue fails the push and drops the member
        let (handle, outbound_rx, mut release) =
            OutboundHandle::channel(self.connection_id, self.config.send_buffer_size);
        let mut send_task = tokio::spawn(write_frames(ws_sender, outbound_rx, self.connection_id));

        let result = match self.dispatch.register(self.identity.clone(), handle) {
            Ok(registration) => {
                let result = self
                    .read_frames(&mut ws_receiver, &mut shutdown_guard, &mut release)
                    .await;
                // Unregisters; the dispatch loop then closes our outbound queue
                drop(registration);
                result
            }
            Err(e) => Err(e),
        };

        // The writer ends once the registry has released the handle, unless
        // it is stuck on a peer that stopped reading
        match tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut send_task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::warn!(
                "Writer task for connection {} failed: {}",
                self.connection_id,
                e
            ),
            Err(_) => {
                log::warn!(
                    "Writer for connection {} still blocked after {:?}, aborting",
                    self.connection_id,
                    WRITER_DRAIN_TIMEOUT
                );
                send_task.abort();
            }
        }

        self.metrics.connection_closed(match &result {
            Ok(()) => "normal",
            Err(e) => e.kind(),
        });

        log::info!(
            "WebSocket connection {} closed for {}",
            self.connection_id,
            self.identity
        );

        result
    }

    /// Read until the peer leaves, the registry releases our handle, the idle
    /// timeout fires, or shutdown.
    async fn read_frames(
        &self,
        ws_receiver: &mut SplitStream<WebSocket>,
        shutdown_guard: &mut ShutdownGuard,
        release: &mut ReleaseSignal,
    ) -> Result<()> {
        let idle_timeout = self.config.idle_timeout;

        loop {
            let idle = async {
                match idle_timeout {
                    Some(timeout) => tokio::time::sleep(timeout).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                biased;

                // Removed or superseded: stop relaying for a member that is gone
                _ = release.released() => {
                    log::info!(
                        "Connection {} released by the dispatch loop",
                        self.connection_id
                    );
                    return Err(WsError::released());
                }

                msg = ws_receiver.next() => {
                    match msg {
                        Some(Ok(msg)) => {
                            if self.handle_client_message(msg).await?.is_break() {
                                return Ok(());
                            }
                        }
                        Some(Err(e)) => {
                            log::warn!(
                                "WebSocket error on connection {}: {}",
                                self.connection_id,
                                e
                            );
                            return Err(WsError::connection_closed(format!("WebSocket error: {}", e)));
                        }
                        None => {
                            log::info!("Connection {} closed by client", self.connection_id);
                            return Ok(());
                        }
                    }
                }

                _ = idle => {
                    return Err(WsError::IdleTimeout {
                        timeout_ms: idle_timeout.unwrap_or_default().as_millis(),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }

                _ = shutdown_guard.wait() => {
                    log::info!("Shutting down connection {} gracefully", self.connection_id);
                    return Ok(());
                }
            }
        }
    }

    /// Handle a frame from the client
    async fn handle_client_message(&self, msg: Message) -> Result<ControlFlow<()>> {
        match msg {
            Message::Text(text) => {
                self.metrics.frame_received("text");
                self.dispatch.broadcast(&self.identity, text).await?;
                Ok(ControlFlow::Continue(()))
            }
            Message::Binary(data) => {
                self.metrics.frame_received("binary");
                log::debug!(
                    "Ignoring binary frame ({} bytes) from connection {}",
                    data.len(),
                    self.connection_id
                );
                Ok(ControlFlow::Continue(()))
            }
            Message::Ping(_) | Message::Pong(_) => Ok(ControlFlow::Continue(())),
            Message::Close(_) => {
                log::info!("Received close frame from connection {}", self.connection_id);
                Ok(ControlFlow::Break(()))
            }
        }
    }
}

/// Drain the outbound queue into the socket until the queue closes
async fn write_frames(
    mut ws_sender: SplitSink<WebSocket, Message>,
    mut outbound_rx: mpsc::Receiver<Message>,
    connection_id: ConnectionId,
) {
    while let Some(msg) = outbound_rx.recv().await {
        let closing = matches!(msg, Message::Close(_));

        if let Err(e) = ws_sender.send(msg).await {
            log::debug!("Write to connection {} failed: {}", connection_id, e);
            break;
        }

        if closing {
            break;
        }
    }

    // Any further push to this connection now fails with a closed queue
    drop(outbound_rx);
    let _ = ws_sender.close().await;
}
