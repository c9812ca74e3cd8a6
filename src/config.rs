//! Server configuration.

use clap::Parser;

/// Command line configuration for the relay server
#[derive(Debug, Clone, Parser)]
#[command(name = "server", about = "WebSocket broadcast relay server")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// TCP port to listen on
    #[arg(long, default_value_t = 9000)]
    pub port: u16,
}
