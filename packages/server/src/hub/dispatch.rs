//! Per-session read loop.
//!
//! Decodes inbound frames strictly in arrival order, enforces the
//! authentication gate and invokes handlers one at a time. Any violation
//! closes the session and ends the loop.

use std::sync::Arc;

use futures_util::{Stream, StreamExt};

use crate::domain::{Envelope, Frame, TransportError, transport::EXPECTED_CLOSE_CODES};

use super::{error::SessionError, manager::Hub, session::Session};

/// What the loop does with one read result.
enum Step {
    Dispatch(String),
    Skip,
    /// Client went away; close without logging
    Disconnect,
    Fail(SessionError),
}

fn classify(next: Option<Result<Frame, TransportError>>) -> Step {
    match next {
        None => Step::Disconnect,
        Some(Ok(Frame::Text(text))) => Step::Dispatch(text),
        Some(Ok(Frame::Control)) => Step::Skip,
        Some(Ok(Frame::Binary)) => Step::Fail(SessionError::BadRequest),
        Some(Ok(Frame::Close(None) | Frame::Reset)) => Step::Disconnect,
        Some(Ok(Frame::Close(Some(code)))) if EXPECTED_CLOSE_CODES.contains(&code) => {
            Step::Disconnect
        }
        Some(Ok(Frame::Close(Some(code)))) => Step::Fail(SessionError::UnexpectedClose(code)),
        Some(Err(e)) => Step::Fail(SessionError::Transport(e)),
    }
}

/// Run the dispatch loop until the session is closed.
pub async fn run<S>(hub: Arc<Hub>, session: Arc<Session>, mut frames: S)
where
    S: Stream<Item = Result<Frame, TransportError>> + Unpin,
{
    loop {
        if session.is_close_signaled() {
            break;
        }

        let next = tokio::select! {
            biased;
            _ = session.closed() => break,
            next = frames.next() => next,
        };

        let text = match classify(next) {
            Step::Dispatch(text) => text,
            Step::Skip => continue,
            Step::Disconnect => {
                tracing::debug!(session = %session.id(), "client disconnected");
                session.signal_close();
                break;
            }
            Step::Fail(err) => {
                session.signal_close_with_reason(&err);
                break;
            }
        };

        let was_authenticated = session.is_authenticated();
        if let Err(err) = dispatch(&hub, &session, &text).await {
            session.signal_close_with_reason(&err);
            break;
        }

        // later envelopes may broadcast to this identity; hold them until
        // the hub has the session
        if !was_authenticated && session.is_authenticated() {
            tokio::select! {
                biased;
                _ = session.closed() => break,
                _ = session.registered() => {}
            }
        }
    }
}

/// Route one text frame to its handler.
async fn dispatch(hub: &Hub, session: &Arc<Session>, text: &str) -> Result<(), SessionError> {
    let envelope = Envelope::decode(text).map_err(|e| {
        tracing::debug!(session = %session.id(), "undecodable frame: {}", e);
        SessionError::BadRequest
    })?;
    let kind = envelope.parsed_kind().map_err(|e| {
        tracing::debug!(session = %session.id(), "{}", e);
        SessionError::BadRequest
    })?;

    if !session.is_authenticated() && !kind.is_bootstrap() {
        return Err(SessionError::NotAuthorized);
    }

    let Some(handler) = hub.handlers().lookup(&kind) else {
        tracing::debug!(session = %session.id(), kind = %kind, "no handler registered; dropping");
        return Ok(());
    };

    handler.handle(hub, session, envelope.data).await?;
    Ok(())
}
