use crate::{ConfigError, ConfigErrorResult, ConfigSection};

use serde::Deserialize;

// Send buffer size constraints
pub const MIN_SEND_BUFFER_SIZE: usize = 1;
pub const MAX_SEND_BUFFER_SIZE: usize = 10000;
pub const DEFAULT_SEND_BUFFER_SIZE: usize = 100;

// Broadcast queue constraints
pub const MIN_BROADCAST_QUEUE_CAPACITY: usize = 1;
pub const MAX_BROADCAST_QUEUE_CAPACITY: usize = 100_000;
pub const DEFAULT_BROADCAST_QUEUE_CAPACITY: usize = 1024;

// Idle timeout constraints (seconds, 0 = disabled)
pub const MIN_IDLE_TIMEOUT_SECS: u64 = 10;
pub const MAX_IDLE_TIMEOUT_SECS: u64 = 86_400;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 0;

/// WebSocket session and dispatch settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    /// Outbound frames buffered per connection before pushes start failing
    pub send_buffer_size: usize,
    /// Broadcast requests buffered in front of the dispatch loop
    pub broadcast_queue_capacity: usize,
    /// Close sessions that send nothing for this long (0 = never)
    pub idle_timeout_secs: u64,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: DEFAULT_SEND_BUFFER_SIZE,
            broadcast_queue_capacity: DEFAULT_BROADCAST_QUEUE_CAPACITY,
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
        }
    }
}

impl WebSocketConfig {
    /// Validate all fields are within acceptable ranges.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.send_buffer_size < MIN_SEND_BUFFER_SIZE
            || self.send_buffer_size > MAX_SEND_BUFFER_SIZE
        {
            return Err(ConfigError::invalid(
                ConfigSection::WebSocket,
                format!(
                    "websocket.send_buffer_size must be {}-{}, got {}",
                    MIN_SEND_BUFFER_SIZE, MAX_SEND_BUFFER_SIZE, self.send_buffer_size
                ),
            ));
        }

        if self.broadcast_queue_capacity < MIN_BROADCAST_QUEUE_CAPACITY
            || self.broadcast_queue_capacity > MAX_BROADCAST_QUEUE_CAPACITY
        {
            return Err(ConfigError::invalid(
                ConfigSection::WebSocket,
                format!(
                    "websocket.broadcast_queue_capacity must be {}-{}, got {}",
                    MIN_BROADCAST_QUEUE_CAPACITY,
                    MAX_BROADCAST_QUEUE_CAPACITY,
                    self.broadcast_queue_capacity
                ),
            ));
        }

        if self.idle_timeout_secs != 0
            && (self.idle_timeout_secs < MIN_IDLE_TIMEOUT_SECS
                || self.idle_timeout_secs > MAX_IDLE_TIMEOUT_SECS)
        {
            return Err(ConfigError::invalid(
                ConfigSection::WebSocket,
                format!(
                    "websocket.idle_timeout_secs must be 0 (disabled) or {}-{}, got {}",
                    MIN_IDLE_TIMEOUT_SECS, MAX_IDLE_TIMEOUT_SECS, self.idle_timeout_secs
                ),
            ));
        }

        Ok(())
    }
}
