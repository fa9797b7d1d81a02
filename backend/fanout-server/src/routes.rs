use crate::health;

use fanout_ws::AppState;

use axum::{Router, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints.
///
/// `/metrics` is only mounted when a Prometheus handle is supplied.
pub fn build_router(state: AppState, prometheus: Option<PrometheusHandle>) -> Router {
    let mut router = Router::new()
        // WebSocket endpoint
        .route("/ws", get(fanout_ws::handler))
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness));

    if let Some(handle) = prometheus {
        router = router.route(
            "/metrics",
            get(move || std::future::ready(handle.render())),
        );
    }

    router
        .with_state(state)
        // CORS middleware (allow all origins for WebSocket)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
