//! Error types for the MCP server

use thiserror::Error;

/// Failures starting or running an MCP transport
#[derive(Debug, Error)]
pub enum ServerError {
    /// The HTTP listener could not be bound
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    /// The MCP transport failed to initialize or terminated abnormally
    #[error("MCP transport error: {0}")]
    Transport(String),

    /// The background server task panicked or was aborted
    #[error("Server task failed: {0}")]
    Task(String),
}
