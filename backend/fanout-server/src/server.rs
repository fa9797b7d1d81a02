use crate::error::{Result, ServerError};
use crate::routes::build_router;

use fanout_config::{Config, WebSocketConfig};
use fanout_ws::{
    AppState, ConnectionConfig, DispatchConfig, Dispatcher, Metrics, ShutdownCoordinator,
};

use std::time::Duration;

use log::{info, warn};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;

/// Session settings derived from the `[websocket]` config section
pub fn connection_config(websocket: &WebSocketConfig) -> ConnectionConfig {
    ConnectionConfig {
        send_buffer_size: websocket.send_buffer_size,
        idle_timeout: match websocket.idle_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        },
    }
}

/// Run the relay on `listener` until `shutdown` fires.
///
/// Starts the dispatch loop, serves the router with graceful shutdown, then
/// waits for the dispatch loop to close every remaining connection.
pub async fn serve(
    listener: TcpListener,
    config: &Config,
    shutdown: ShutdownCoordinator,
    prometheus: Option<PrometheusHandle>,
) -> Result<()> {
    let metrics = Metrics::new();

    let (dispatcher, dispatch) = Dispatcher::new(
        DispatchConfig {
            broadcast_queue_capacity: config.websocket.broadcast_queue_capacity,
        },
        metrics.clone(),
    );
    let dispatch_task = tokio::spawn(dispatcher.run(shutdown.subscribe_guard()));

    let app_state = AppState {
        dispatch,
        metrics,
        shutdown: shutdown.clone(),
        config: connection_config(&config.websocket),
    };
    let app = build_router(app_state, prometheus);

    // Actual bound address (important when port is 0 / auto-assigned)
    let local_addr = listener
        .local_addr()
        .map_err(|e| ServerError::io("Failed to read listener address", e))?;
    info!("Server listening on {}", local_addr);

    let mut shutdown_guard = shutdown.subscribe_guard();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_guard.wait().await;
            info!("Stopped accepting connections");
        })
        .await
        .map_err(|e| ServerError::io("Server error", e))?;

    if let Err(e) = dispatch_task.await {
        warn!("Dispatch loop task failed: {}", e);
    }

    info!("Graceful shutdown complete");
    Ok(())
}
