pub mod app_state;
pub mod connection_config;
pub mod connection_handle;
pub mod connection_id;
pub mod connection_registry;
pub mod dispatch_config;
pub mod dispatch_handle;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod metrics;
pub mod outbound_handle;
pub mod registration_guard;
pub mod registry_stats;
pub mod session_identity;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod web_socket_connection;

pub use app_state::{AppState, GROUP_HEADER, USER_HEADER, extract_identity, handler};
pub use connection_config::ConnectionConfig;
pub use connection_handle::ConnectionHandle;
pub use connection_id::ConnectionId;
pub use connection_registry::ConnectionRegistry;
pub use dispatch_config::DispatchConfig;
pub use dispatch_handle::DispatchHandle;
pub use dispatcher::Dispatcher;
pub use error::{Result, WsError};
pub use event::{BroadcastRequest, Event, Registration, Unregistration};
pub use metrics::Metrics;
pub use outbound_handle::{OutboundHandle, ReleaseSignal};
pub use registration_guard::RegistrationGuard;
pub use registry_stats::RegistryStats;
pub use session_identity::SessionIdentity;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use web_socket_connection::WebSocketConnection;

#[cfg(test)]
mod tests;
