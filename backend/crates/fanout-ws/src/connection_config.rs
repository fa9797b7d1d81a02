use std::time::Duration;

/// Configuration for WebSocket sessions
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Outbound frames buffered per connection; a full buffer fails the push
    pub send_buffer_size: usize,
    /// End sessions that receive nothing for this long. None = never.
    pub idle_timeout: Option<Duration>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: 100,
            idle_timeout: None,
        }
    }
}
