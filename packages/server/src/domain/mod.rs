//! Domain layer for the message hub.
//!
//! Wire-level value objects and the transport seam. Nothing in here knows
//! about axum or sessions.

pub mod envelope;
pub mod error;
pub mod transport;
pub mod value_object;

pub use envelope::{Envelope, Payload};
pub use error::{TransportError, ValueObjectError};
pub use transport::{Frame, Transport};
pub use value_object::{BOOTSTRAP_ACTION, BOOTSTRAP_DOMAIN, Identity, Kind};
