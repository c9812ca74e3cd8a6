//! WebSocket broadcast relay server.
//!
//! Receives messages from clients and broadcasts them to all connected
//! clients, the sender included.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! ```

use fanout_relay::logger::setup_logger;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), "debug");

    // Run the server
    if let Err(e) = fanout_relay::run_server().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
