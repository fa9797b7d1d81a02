use fanout_server::{Cli, logger, metrics, serve};

use fanout_ws::ShutdownCoordinator;

use std::error::Error;

use clap::Parser;
use log::{error, info};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Load and validate configuration
    let mut config = fanout_config::Config::load()?;
    if let Some(ref addr) = cli.addr {
        config.server.apply_addr(addr)?;
    }
    config.validate()?;

    // Ensure log directory exists
    let log_file_path = config.log_file_path()?;
    if let Some(log_dir) = log_file_path.as_ref().and_then(|path| path.parent()) {
        std::fs::create_dir_all(log_dir)?;
    }

    // Initialize logger (before any other logging)
    logger::initialize(&config.logging, log_file_path)?;

    info!("Starting fanout-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let prometheus = metrics::install_recorder()?;

    let shutdown = ShutdownCoordinator::new();

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
            }
        }
    });

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;

    info!("Server ready to accept connections");
    serve(listener, &config, shutdown, Some(prometheus)).await?;

    Ok(())
}
