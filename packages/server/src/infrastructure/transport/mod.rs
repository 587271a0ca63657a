//! Transport 実装
//!
//! ドメイン層が定義する `Transport` trait の axum WebSocket 実装。

pub mod websocket;

pub use websocket::{WebSocketTransport, inbound_frames};
