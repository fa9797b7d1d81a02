use crate::{ClientError, ClientResult};

use clap::Parser;

/// Default relay endpoint
pub const DEFAULT_SERVER: &str = "ws://localhost:8080/ws";

#[derive(Parser, Debug)]
#[command(name = "fanout-chat")]
#[command(about = "Interactive client for the fanout group relay")]
#[command(version)]
pub struct Cli {
    /// Group to join
    #[arg(long)]
    pub group: String,

    /// Your user name within the group
    #[arg(long)]
    pub user: String,

    /// Relay WebSocket URL
    #[arg(long, default_value = DEFAULT_SERVER)]
    pub server: String,
}

impl Cli {
    /// Identity values must be non-empty.
    #[track_caller]
    pub fn validate(&self) -> ClientResult<()> {
        if self.group.trim().is_empty() || self.user.trim().is_empty() {
            return Err(ClientError::configuration(
                "Please provide both group and user name using --group and --user",
            ));
        }

        Ok(())
    }
}
