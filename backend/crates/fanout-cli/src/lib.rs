//! fanout-cli library
//!
//! The interactive relay client, exported for the `fanout-chat` binary and tests.

pub mod cli;
pub mod client;
pub mod input;
pub mod session;


pub use cli::Cli;
pub use client::{ClientError, ClientResult, WsStream, build_request, connect};
pub use input::{InputLine, parse_line};
pub use session::run_session;
