//! Top-level server error definitions.

use thiserror::Error;

/// Errors that can terminate the server process
#[derive(Debug, Error)]
pub enum ServerError {
    /// TCP bind or serve failure
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
