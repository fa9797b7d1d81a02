
use fanout_ws::{
    AppState, ConnectionConfig, DispatchConfig, Dispatcher, Metrics, ShutdownCoordinator,
};

/// AppState backed by a running dispatch loop. Call from within a Tokio runtime.
pub(crate) fn running_app_state() -> AppState {
    let metrics = Metrics::new();
    let shutdown = ShutdownCoordinator::new();
    let (dispatcher, dispatch) = Dispatcher::new(DispatchConfig::default(), metrics.clone());
    tokio::spawn(dispatcher.run(shutdown.subscribe_guard()));

    AppState {
        dispatch,
        metrics,
        shutdown,
        config: ConnectionConfig::default(),
    }
}
