use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsError {
    #[error("Connection closed: {reason} {location}")]
    ConnectionClosed {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Send buffer full, client too slow {location}")]
    SendBufferFull { location: ErrorLocation },

    #[error("Connection released by the dispatch loop {location}")]
    Released { location: ErrorLocation },

    #[error("Dispatch loop is no longer running {location}")]
    DispatcherUnavailable { location: ErrorLocation },

    #[error("No frames received for {timeout_ms}ms {location}")]
    IdleTimeout {
        timeout_ms: u128,
        location: ErrorLocation,
    },

    #[error("Invalid identity: missing or empty '{field}' header {location}")]
    InvalidIdentity {
        field: &'static str,
        location: ErrorLocation,
    },
}

impl WsError {
    #[track_caller]
    pub fn connection_closed<S: Into<String>>(reason: S) -> Self {
        Self::ConnectionClosed {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn send_buffer_full() -> Self {
        Self::SendBufferFull {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn released() -> Self {
        Self::Released {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn dispatcher_unavailable() -> Self {
        Self::DispatcherUnavailable {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Short label used for metrics and close reasons
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionClosed { .. } => "connection_closed",
            Self::SendBufferFull { .. } => "slow_client",
            Self::Released { .. } => "released",
            Self::DispatcherUnavailable { .. } => "dispatcher_unavailable",
            Self::IdleTimeout { .. } => "idle_timeout",
            Self::InvalidIdentity { .. } => "invalid_identity",
        }
    }
}

pub type Result<T> = std::result::Result<T, WsError>;
