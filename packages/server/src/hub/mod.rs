//! Connection and session management.
//!
//! - `Session`: one client connection and its auth / close signals
//! - `HandlerRegistry`: immutable `(domain, action) -> handler` table
//! - `Hub`: identity -> session registry and best-effort broadcast
//! - `dispatch`: the per-session read loop and authentication gate

pub mod dispatch;
pub mod error;
pub mod manager;
pub mod registry;
pub mod session;
pub mod signal;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{HandlerError, SessionError};
pub use manager::{BroadcastReport, Hub, HubConfig, Registration, SessionSummary};
pub use registry::{Handler, HandlerRegistry, HandlerRegistryBuilder};
pub use session::{CloseReason, Session};
pub use signal::Signal;
