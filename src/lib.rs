//! WebSocket broadcast relay library.
//!
//! Tracks the set of live connections and fans every inbound message out
//! to all of them, including the sender.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod relay;
pub mod time;
pub mod ui;

// Re-export entry point
pub use ui::run_server;
