pub mod cli;
pub mod error;
pub mod health;
pub mod logger;
pub mod metrics;
pub mod routes;
pub mod server;

#[cfg(test)]
mod tests;

pub use crate::cli::Cli;
pub use crate::error::{Result, ServerError};
pub use crate::routes::build_router;
pub use crate::server::{connection_config, serve};
