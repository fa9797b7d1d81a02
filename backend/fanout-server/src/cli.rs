use clap::Parser;

/// Group message relay over WebSocket
#[derive(Parser, Debug)]
#[command(name = "fanout-server")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Listen address (host:port), overrides server.host and server.port.
    /// An empty host (":8080") listens on all interfaces.
    #[arg(long)]
    pub addr: Option<String>,
}
