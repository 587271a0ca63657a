//! Transport seam between the hub and a concrete socket.
//!
//! The hub only ever talks to a connection through `Transport` (outbound)
//! and a stream of `Frame`s (inbound), so the core can be driven without a
//! real network in tests.

use async_trait::async_trait;

use super::error::TransportError;

/// Close codes a client uses when it simply goes away.
///
/// 1000 normal, 1001 going away. An abnormal closure (1006) never arrives
/// as a frame; it surfaces as `Frame::Reset`.
pub const EXPECTED_CLOSE_CODES: [u16; 2] = [1000, 1001];

/// Inbound frame, independent of the WebSocket library in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary,
    /// Peer close, with its close code if it sent one
    Close(Option<u16>),
    /// Connection dropped without a closing handshake
    Reset,
    /// Ping / pong; answered by the socket layer
    Control,
}

/// Outbound half of one client connection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Write one text frame.
    async fn send_text(&self, text: String) -> Result<(), TransportError>;

    /// Close the connection, optionally stating why.
    ///
    /// Called at most once per connection by the session that owns it.
    async fn close(&self, reason: Option<String>);
}
