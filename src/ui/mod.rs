//! Transport boundary: WebSocket endpoint, HTTP surface, server runner.

pub mod handler;
pub mod runner;
mod signal;
pub mod state;

pub use runner::{router, run_server, run_server_with};
