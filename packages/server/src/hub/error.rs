//! Session-level error taxonomy.
//!
//! Every `SessionError` is terminal for the session it occurred on and for
//! nothing else. Its `Display` text is the close reason sent to the client.

use thiserror::Error;

use crate::domain::{TransportError, ValueObjectError};

/// Errors returned by message handlers
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("token missing")]
    TokenMissing,

    #[error("message missing")]
    MessageMissing,

    #[error("{field} must be a string")]
    InvalidField { field: &'static str },

    #[error("session is not authenticated")]
    Unauthenticated,

    #[error(transparent)]
    InvalidValue(#[from] ValueObjectError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Free-form rejection for handlers registered outside this crate
    #[error("{0}")]
    Rejected(String),
}

/// Reasons a session is closed by the server
#[derive(Debug, Error)]
pub enum SessionError {
    /// Undecodable frame or malformed `kind`
    #[error("bad request")]
    BadRequest,

    /// Non-bootstrap kind sent before authentication
    #[error("not authorized")]
    NotAuthorized,

    /// No authentication within the configured deadline
    #[error("authentication timed out")]
    AuthTimeout,

    /// Peer closed with a code other than normal / going away / abnormal
    #[error("unexpected close (code {0})")]
    UnexpectedClose(u16),

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error("read failed: {0}")]
    Transport(#[from] TransportError),
}
