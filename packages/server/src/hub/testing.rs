//! Test doubles shared by the hub and usecase tests.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;

use crate::{
    domain::{Envelope, Identity, Payload, Transport, TransportError},
    hub::{Handler, HandlerError, HandlerRegistry, Hub, HubConfig, Session},
};

/// Transport that records everything written to it.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<String>>,
    closes: Mutex<Vec<Option<String>>>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn envelopes(&self) -> Vec<Envelope> {
        self.sent()
            .iter()
            .map(|text| Envelope::decode(text).unwrap())
            .collect()
    }

    pub fn closes(&self) -> Vec<Option<String>> {
        self.closes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(&self, text: String) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(text);
        Ok(())
    }

    async fn close(&self, reason: Option<String>) {
        self.closes.lock().unwrap().push(reason);
    }
}

/// Handler that counts invocations and optionally fails.
#[derive(Debug, Default)]
pub struct CountingHandler {
    calls: AtomicUsize,
    fail_with: Option<String>,
}

impl CountingHandler {
    pub fn failing(reason: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_with: Some(reason.to_string()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Handler for CountingHandler {
    async fn handle(
        &self,
        _hub: &Hub,
        _session: &Arc<Session>,
        _data: Payload,
    ) -> Result<(), HandlerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(reason) => Err(HandlerError::Rejected(reason.clone())),
            None => Ok(()),
        }
    }
}

/// Handler that authenticates every session as the identity in `data["t"]`.
#[derive(Debug, Default)]
pub struct TokenIsIdentity;

#[async_trait]
impl Handler for TokenIsIdentity {
    async fn handle(
        &self,
        _hub: &Hub,
        session: &Arc<Session>,
        data: Payload,
    ) -> Result<(), HandlerError> {
        let token = data
            .get("t")
            .and_then(|t| t.as_str())
            .ok_or(HandlerError::TokenMissing)?;
        session.authenticate(Identity::new(token)?);
        Ok(())
    }
}

pub fn empty_hub() -> Arc<Hub> {
    Arc::new(Hub::new(
        Arc::new(HandlerRegistry::builder().build()),
        HubConfig::default(),
    ))
}

pub fn recording_session() -> (Arc<Session>, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    let session = Arc::new(Session::new(transport.clone()));
    (session, transport)
}
