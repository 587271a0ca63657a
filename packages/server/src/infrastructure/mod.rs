//! Infrastructure layer: concrete implementations of domain seams.

pub mod transport;

pub use transport::{WebSocketTransport, inbound_frames};
