//! Error types for the build events server

use thiserror::Error;

/// Errors raised while configuring or starting the HTTP interface
///
/// Ingestion and fan-out have no error path: unknown events are ignored and a
/// failing subscriber is dropped locally.
#[derive(Debug, Error)]
pub enum Error {
    /// The listen address could not be bound
    #[error("creating listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The server task failed after binding, reported by `stop`
    #[error("serving event API: {0}")]
    Serve(#[source] std::io::Error),

    /// Invalid configuration value
    #[error("invalid configuration {key}: {message}")]
    Config { key: String, message: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
