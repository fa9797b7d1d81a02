use crate::{
    ConnectionConfig, ConnectionId, DispatchHandle, Metrics, OutboundHandle, Result,
    SessionIdentity, ShutdownCoordinator, WebSocketConnection, WsError,
};

use std::panic::Location;

use axum::{
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode},
    response::Response,
};
use error_location::ErrorLocation;
use log::{debug, error, info, warn};

/// Header carrying the group a client joins
pub const GROUP_HEADER: &str = "group";
/// Header carrying the client's user name within the group
pub const USER_HEADER: &str = "user";

/// Shared application state for WebSocket handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatch: DispatchHandle<OutboundHandle>,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
    pub config: ConnectionConfig,
}

/// WebSocket upgrade handler
pub async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> std::result::Result<Response, StatusCode> {
    let identity = extract_identity(&headers).map_err(|e| {
        warn!("Rejected WebSocket upgrade: {}", e);
        StatusCode::BAD_REQUEST
    })?;
    debug!("WebSocket upgrade request from {}", identity);

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, identity, state)))
}

/// Handle WebSocket connection after upgrade
async fn handle_socket(socket: WebSocket, identity: SessionIdentity, state: AppState) {
    let connection_id = ConnectionId::new();
    let shutdown_guard = state.shutdown.subscribe_guard();

    let connection = WebSocketConnection::new(
        connection_id,
        identity,
        state.config,
        state.metrics,
        state.dispatch,
    );

    match connection.handle(socket, shutdown_guard).await {
        Ok(()) => {}
        Err(e @ (WsError::IdleTimeout { .. } | WsError::Released { .. })) => {
            info!("Connection {connection_id} evicted: {e}")
        }
        Err(e) => error!("Connection {connection_id} error: {e}"),
    }
}

/// Read the session identity from the upgrade request headers.
///
/// Values are trusted as-is; only presence is checked.
pub fn extract_identity(headers: &HeaderMap) -> Result<SessionIdentity> {
    let group = header_value(headers, GROUP_HEADER)?;
    let user = header_value(headers, USER_HEADER)?;
    Ok(SessionIdentity::new(group, user))
}

#[track_caller]
fn header_value(headers: &HeaderMap, field: &'static str) -> Result<String> {
    match headers.get(field).and_then(|value| value.to_str().ok()) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(WsError::InvalidIdentity {
            field,
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}
