//! Real-time WebSocket message hub.
//!
//! Clients connect over `/ws`, authenticate with `auth:validate`, then
//! exchange `{"kind": "<domain>:<action>", "data": {...}}` envelopes that
//! are routed to registered handlers. Handlers may push envelopes to other
//! authenticated clients through the [`hub::Hub`].

pub mod config;
pub mod domain;
pub mod error;
pub mod hub;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::Config;
pub use ui::run as run_server;
