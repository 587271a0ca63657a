//! Per-connection session state.
//!
//! A session is unauthenticated until its auth signal completes, and is
//! finished once its close signal completes. Presence in the `Hub`
//! registry is tracked by the hub, not here.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use switchboard_shared::time::get_jst_timestamp;
use uuid::Uuid;

use crate::domain::{Envelope, Identity, Transport, TransportError};

use super::{error::SessionError, signal::Signal};

/// Why a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The client went away, or the server shut the session down quietly
    Normal,
    /// Protocol, authorization, handler or unexpected transport failure
    Violation(String),
}

impl CloseReason {
    /// Text sent to the client in the close frame, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Normal => None,
            Self::Violation(reason) => Some(reason),
        }
    }
}

/// Server-side state for one live client connection.
pub struct Session {
    id: Uuid,
    connected_at: i64,
    transport: Arc<dyn Transport>,
    auth: Signal<Identity>,
    registered: Signal<()>,
    close: Signal<CloseReason>,
    shut_down: AtomicBool,
}

impl Session {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            id: Uuid::new_v4(),
            connected_at: get_jst_timestamp(),
            transport,
            auth: Signal::new(),
            registered: Signal::new(),
            close: Signal::new(),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Connection id, for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Unix timestamp (milliseconds) when the connection was accepted
    pub fn connected_at(&self) -> i64 {
        self.connected_at
    }

    /// `None` until an authentication handler has succeeded.
    pub fn identity(&self) -> Option<Identity> {
        self.auth.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_completed()
    }

    /// Assign the identity and publish the authentication signal.
    ///
    /// Only the first call takes effect; returns `false` for later calls.
    pub fn authenticate(&self, identity: Identity) -> bool {
        let accepted = self.auth.complete(identity);
        if !accepted {
            tracing::debug!(session = %self.id, "session already authenticated; ignoring");
        }
        accepted
    }

    /// Wait for the authentication signal.
    pub async fn authenticated(&self) -> Identity {
        self.auth.wait().await
    }

    pub(crate) fn mark_registered(&self) {
        self.registered.complete(());
    }

    /// Wait until the hub has inserted this session into its registry.
    pub async fn registered(&self) {
        self.registered.wait().await
    }

    /// Serialize `envelope` and write it as one text frame.
    pub async fn send(&self, envelope: &Envelope) -> Result<(), TransportError> {
        let text = envelope.encode()?;
        self.send_text(text).await
    }

    pub(crate) async fn send_text(&self, text: String) -> Result<(), TransportError> {
        self.transport.send_text(text).await
    }

    /// Request a quiet close. Idempotent.
    pub fn signal_close(&self) {
        self.close.complete(CloseReason::Normal);
    }

    /// Log `err` and request a close carrying it as the reason. Idempotent;
    /// only the first close request decides the reason.
    pub fn signal_close_with_reason(&self, err: &SessionError) {
        tracing::warn!(
            session = %self.id,
            identity = ?self.identity().map(Identity::into_string),
            "closing session: {}",
            err
        );
        self.close.complete(CloseReason::Violation(err.to_string()));
    }

    pub fn is_close_signaled(&self) -> bool {
        self.close.is_completed()
    }

    pub fn close_reason(&self) -> Option<CloseReason> {
        self.close.get()
    }

    /// Wait for the close signal.
    pub async fn closed(&self) -> CloseReason {
        self.close.wait().await
    }

    /// Close the underlying transport. Only the first call reaches it.
    pub(crate) async fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }
        let reason = self.close_reason().and_then(|r| r.message().map(str::to_string));
        self.transport.close(reason).await;
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("identity", &self.identity())
            .field("close", &self.close_reason())
            .finish_non_exhaustive()
    }
}
