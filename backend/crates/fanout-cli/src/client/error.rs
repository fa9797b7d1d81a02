use error_location::ErrorLocation;
use std::panic::Location;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors that can occur while talking to the relay
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {message} {location}")]
    Configuration {
        message: String,
        location: ErrorLocation,
    },

    #[error("WebSocket error: {message} {location}")]
    WebSocket {
        message: String,
        location: ErrorLocation,
        #[source]
        source: tungstenite::Error,
    },

    #[error("Invalid header {name}: {message} {location}")]
    Header {
        name: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("Handshake timed out after {seconds}s {location}")]
    Timeout {
        seconds: u64,
        location: ErrorLocation,
    },

    #[error("I/O error: {message} {location}")]
    Io {
        message: String,
        location: ErrorLocation,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    #[track_caller]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        ClientError::Configuration {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Convert tungstenite error with context
    #[track_caller]
    pub fn from_tungstenite(err: tungstenite::Error) -> Self {
        ClientError::WebSocket {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    /// Convert I/O error with context
    #[track_caller]
    pub fn from_io(err: std::io::Error) -> Self {
        ClientError::Io {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }
}

impl From<tungstenite::Error> for ClientError {
    #[track_caller]
    fn from(err: tungstenite::Error) -> Self {
        ClientError::from_tungstenite(err)
    }
}

impl From<std::io::Error> for ClientError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        ClientError::from_io(err)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
