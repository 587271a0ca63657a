//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// Kind is not exactly two non-empty, colon-separated parts
    #[error("kind must have the form '<domain>:<action>' (got: '{0}')")]
    KindMalformed(String),

    /// Identity validation error
    #[error("Identity cannot be empty")]
    IdentityEmpty,
}

/// Errors raised while writing to or reading from a client connection
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connection (or its writer) is already gone
    #[error("connection closed")]
    Closed,

    /// The envelope could not be serialized
    #[error("failed to encode envelope: {0}")]
    Encode(#[from] serde_json::Error),

    /// Low-level I/O or protocol failure reported by the socket
    #[error("transport failure: {0}")]
    Io(#[source] Box<dyn std::error::Error + Send + Sync>),
}
