pub(crate) mod client;
pub(crate) mod error;

pub use client::{HANDSHAKE_TIMEOUT, WsStream, build_request, connect};
pub use error::{ClientError, Result as ClientResult};
