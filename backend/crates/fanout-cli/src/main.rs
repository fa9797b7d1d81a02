//! fanout-chat - interactive client for the fanout relay
//!
//! # Examples
//!
//! ```bash
//! fanout-chat --group acme --user alice
//! fanout-chat --group acme --user bob --server ws://10.0.0.5:8080/ws
//! ```

use fanout_cli::{Cli, connect, run_session};

use std::process::ExitCode;

use clap::Parser;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = cli.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let ws = match connect(&cli.server, &cli.group, &cli.user).await {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("Error connecting to {}: {}", cli.server, e);
            return ExitCode::FAILURE;
        }
    };

    let input = BufReader::new(tokio::io::stdin());
    match run_session(ws, input, tokio::io::stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
