#![allow(dead_code)]

use fanout_ws::{
    AppState, ConnectionConfig, DispatchConfig, Dispatcher, Metrics, RegistryStats,
    ShutdownCoordinator,
};

use std::time::Duration;

use axum::{Router, routing::get};
use axum_test::TestServer;

/// Configuration for test server instances
#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub send_buffer_size: usize,
    pub idle_timeout: Option<Duration>,
    pub broadcast_queue_capacity: usize,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: 100,
            idle_timeout: None,
            broadcast_queue_capacity: 1024,
        }
    }
}

impl TestServerConfig {
    /// Create config that evicts silent sessions quickly
    pub fn with_idle_timeout(timeout: Duration) -> Self {
        Self {
            idle_timeout: Some(timeout),
            ..Default::default()
        }
    }
}

/// Test server with access to AppState for testing
pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
}

impl TestServerWithState {
    /// Wait until the dispatch loop reports `members` registered sessions
    pub async fn wait_for_members(&self, members: usize) {
        let mut stats = self.app_state.dispatch.subscribe_stats();
        let reached = matches!(
            tokio::time::timeout(
                Duration::from_secs(2),
                stats.wait_for(|s| s.members == members)
            )
            .await,
            Ok(Ok(_))
        );
        assert!(
            reached,
            "expected {} members, registry has {:?}",
            members,
            self.app_state.dispatch.stats()
        );
    }

    pub fn stats(&self) -> RegistryStats {
        self.app_state.dispatch.stats()
    }
}

/// Create a TestServer with default configuration
pub fn create_test_server() -> TestServerWithState {
    create_test_server_with_config(TestServerConfig::default())
}

/// Create a TestServer with custom configuration.
/// Must be called from within a Tokio runtime (spawns the dispatch loop).
pub fn create_test_server_with_config(config: TestServerConfig) -> TestServerWithState {
    let (app, app_state) = create_app(config);
    let server = TestServer::builder()
        .http_transport()
        .build(app)
        .expect("Failed to create test server");

    TestServerWithState { server, app_state }
}

/// Build the Axum Router with AppState and start the dispatch loop
fn create_app(config: TestServerConfig) -> (Router, AppState) {
    let metrics = Metrics::default();
    let shutdown = ShutdownCoordinator::new();

    let (dispatcher, dispatch) = Dispatcher::new(
        DispatchConfig {
            broadcast_queue_capacity: config.broadcast_queue_capacity,
        },
        metrics.clone(),
    );
    tokio::spawn(dispatcher.run(shutdown.subscribe_guard()));

    let app_state = AppState {
        dispatch,
        metrics,
        shutdown,
        config: ConnectionConfig {
            send_buffer_size: config.send_buffer_size,
            idle_timeout: config.idle_timeout,
        },
    };

    let router = Router::new()
        .route("/ws", get(fanout_ws::handler))
        .with_state(app_state.clone());

    (router, app_state)
}
