//! Session manager: the identity -> session registry and broadcast.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::Duration,
};

use futures_util::{Stream, future::join_all};
use tokio::sync::Mutex;

use crate::domain::{Envelope, Frame, Identity, Transport, TransportError};

use super::{
    dispatch,
    error::SessionError,
    registry::HandlerRegistry,
    session::{CloseReason, Session},
};

/// Hub tuning knobs.
#[derive(Debug, Clone, Default)]
pub struct HubConfig {
    /// Close sessions that have not authenticated within this long.
    /// `None` waits forever.
    pub auth_timeout: Option<Duration>,
}

/// Outcome of the authentication gate for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Authenticated(Identity),
    Closed(CloseReason),
}

/// Per-call delivery counts of a broadcast.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed: usize,
    /// Requested identities with no registered session
    pub skipped: usize,
}

/// Registered session as seen from the outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub identity: Identity,
    pub connected_at: i64,
}

/// Owns every authenticated session, keyed by identity.
///
/// The registry lock is only held while the map is read or mutated, never
/// across a send or while waiting for a session to authenticate.
#[derive(Debug)]
pub struct Hub {
    handlers: Arc<HandlerRegistry>,
    sessions: Mutex<HashMap<Identity, Arc<Session>>>,
    config: HubConfig,
}

impl Hub {
    pub fn new(handlers: Arc<HandlerRegistry>, config: HubConfig) -> Self {
        Self {
            handlers,
            sessions: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Run one accepted connection to completion.
    ///
    /// Creates the session, spawns its dispatch loop over `frames`, and
    /// returns once the session has been torn down.
    pub async fn accept<S>(
        self: &Arc<Self>,
        transport: Arc<dyn Transport>,
        frames: S,
    ) -> CloseReason
    where
        S: Stream<Item = Result<Frame, TransportError>> + Send + Unpin + 'static,
    {
        let session = Arc::new(Session::new(transport));
        tracing::info!(session = %session.id(), "connection accepted");

        let dispatch = tokio::spawn(dispatch::run(
            Arc::clone(self),
            Arc::clone(&session),
            frames,
        ));
        let reason = self.serve(Arc::clone(&session)).await;

        if let Err(e) = dispatch.await {
            tracing::error!(session = %session.id(), "dispatch loop panicked: {}", e);
        }
        reason
    }

    /// Drive a session through registration until it closes, then tear it
    /// down.
    pub async fn serve(&self, session: Arc<Session>) -> CloseReason {
        match self.register(&session).await {
            Registration::Closed(reason) => reason,
            Registration::Authenticated(_) => {
                let reason = session.closed().await;
                self.teardown(&session).await;
                reason
            }
        }
    }

    /// Wait until `session` either authenticates or closes.
    ///
    /// On authentication the session is inserted under its identity,
    /// replacing any previous entry for that identity. On close it is torn
    /// down and never inserted.
    pub async fn register(&self, session: &Arc<Session>) -> Registration {
        match self.authenticate_or_close(session).await {
            Ok(identity) => {
                let mut sessions = self.sessions.lock().await;
                if let Some(previous) = sessions.insert(identity.clone(), Arc::clone(session))
                    && !Arc::ptr_eq(&previous, session)
                {
                    tracing::debug!(
                        identity = %identity,
                        replaced = %previous.id(),
                        "identity authenticated again; replacing registry entry"
                    );
                }
                drop(sessions);
                session.mark_registered();

                tracing::info!(session = %session.id(), identity = %identity, "session registered");
                Registration::Authenticated(identity)
            }
            Err(reason) => {
                self.teardown(session).await;
                tracing::info!(session = %session.id(), "session closed before authenticating");
                Registration::Closed(reason)
            }
        }
    }

    async fn authenticate_or_close(&self, session: &Session) -> Result<Identity, CloseReason> {
        let gate = async {
            tokio::select! {
                biased;
                reason = session.closed() => Err(reason),
                identity = session.authenticated() => Ok(identity),
            }
        };

        let Some(limit) = self.config.auth_timeout else {
            return gate.await;
        };
        match tokio::time::timeout(limit, gate).await {
            Ok(outcome) => outcome,
            Err(_) => {
                session.signal_close_with_reason(&SessionError::AuthTimeout);
                Err(session.closed().await)
            }
        }
    }

    /// Remove the session's registry entry if it still points at this
    /// session, then close its transport.
    async fn teardown(&self, session: &Arc<Session>) {
        if let Some(identity) = session.identity() {
            let mut sessions = self.sessions.lock().await;
            if sessions
                .get(&identity)
                .is_some_and(|current| Arc::ptr_eq(current, session))
            {
                sessions.remove(&identity);
                tracing::info!(session = %session.id(), identity = %identity, "session removed");
            }
        }
        session.shutdown().await;
    }

    /// Deliver `envelope` to every registered session in `identities`.
    ///
    /// Best effort: unknown identities are skipped and failed sends are
    /// logged, neither aborts delivery to the rest. Returns once every
    /// attempt has finished.
    pub async fn broadcast(&self, envelope: &Envelope, identities: &[Identity]) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        let targets: Vec<(Identity, Arc<Session>)> = {
            let sessions = self.sessions.lock().await;
            let mut seen = HashSet::new();
            identities
                .iter()
                .filter(|identity| seen.insert(*identity))
                .filter_map(|identity| match sessions.get(identity) {
                    Some(session) => Some((identity.clone(), Arc::clone(session))),
                    None => {
                        report.skipped += 1;
                        None
                    }
                })
                .collect()
        };

        let text = match envelope.encode() {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(kind = %envelope.kind, "failed to encode envelope: {}", e);
                report.failed = targets.len();
                return report;
            }
        };

        let deliveries = targets.iter().map(|(identity, session)| {
            let text = text.clone();
            async move { (identity, session.send_text(text).await) }
        });
        for (identity, result) in join_all(deliveries).await {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        identity = %identity,
                        kind = %envelope.kind,
                        "failed to deliver message: {}",
                        e
                    );
                }
            }
        }

        report
    }

    /// Number of registered sessions
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    pub async fn session(&self, identity: &str) -> Option<Arc<Session>> {
        self.sessions.lock().await.get(identity).cloned()
    }

    /// Registered sessions ordered by identity.
    pub async fn snapshot(&self) -> Vec<SessionSummary> {
        let sessions = self.sessions.lock().await;
        let mut summaries: Vec<SessionSummary> = sessions
            .iter()
            .map(|(identity, session)| SessionSummary {
                identity: identity.clone(),
                connected_at: session.connected_at(),
            })
            .collect();
        summaries.sort_by(|a, b| a.identity.cmp(&b.identity));
        summaries
    }
}
