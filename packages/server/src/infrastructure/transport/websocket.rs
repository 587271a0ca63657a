//! axum WebSocket-backed transport.
//!
//! Writes go through an unbounded channel into a single writer task that
//! owns the socket sink, so concurrent senders (e.g. several broadcasts
//! targeting the same client) never interleave on the wire.

use std::io;

use async_trait::async_trait;
use axum::extract::ws::{CloseFrame, Message, WebSocket, close_code};
use futures_util::{
    SinkExt, Stream, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::{sync::mpsc, task::JoinHandle};
use tungstenite::error::{Error as WsError, ProtocolError};

use crate::domain::{Frame, Transport, TransportError};

/// Outbound half of one WebSocket connection.
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    outbound: mpsc::UnboundedSender<Message>,
}

impl WebSocketTransport {
    /// Spawn the writer task for `sink`.
    ///
    /// The task ends after it has written a close frame, when every
    /// `WebSocketTransport` clone is dropped, or on the first write error.
    pub fn spawn(sink: SplitSink<WebSocket, Message>) -> (Self, JoinHandle<()>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(write_loop(sink, rx));
        (Self { outbound }, writer)
    }

    #[cfg(test)]
    fn from_sender(outbound: mpsc::UnboundedSender<Message>) -> Self {
        Self { outbound }
    }
}

async fn write_loop(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<Message>,
) {
    while let Some(message) = rx.recv().await {
        let closing = matches!(message, Message::Close(_));
        if let Err(e) = sink.send(message).await {
            tracing::debug!("websocket write failed: {}", e);
            break;
        }
        if closing {
            break;
        }
    }
    if let Err(e) = sink.close().await {
        tracing::debug!("websocket close failed: {}", e);
    }
}

fn close_message(reason: Option<String>) -> Message {
    Message::Close(reason.map(|reason| CloseFrame {
        code: close_code::POLICY,
        reason: reason.into(),
    }))
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn send_text(&self, text: String) -> Result<(), TransportError> {
        self.outbound
            .send(Message::Text(text.into()))
            .map_err(|_| TransportError::Closed)
    }

    async fn close(&self, reason: Option<String>) {
        // the writer may already be gone if the peer vanished
        let _ = self.outbound.send(close_message(reason));
    }
}

fn to_frame(message: Message) -> Frame {
    match message {
        Message::Text(text) => Frame::Text(text.as_str().to_owned()),
        Message::Binary(_) => Frame::Binary,
        Message::Close(frame) => Frame::Close(frame.map(|frame| frame.code)),
        Message::Ping(_) | Message::Pong(_) => Frame::Control,
    }
}

fn is_reset_kind(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::BrokenPipe
    )
}

/// Whether a read error means the peer vanished without a close frame.
fn is_abnormal_closure(err: &(dyn std::error::Error + Send + Sync + 'static)) -> bool {
    if let Some(err) = err.downcast_ref::<WsError>() {
        return match err {
            WsError::ConnectionClosed
            | WsError::AlreadyClosed
            | WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake) => true,
            WsError::Io(io) => is_reset_kind(io.kind()),
            _ => false,
        };
    }
    err.downcast_ref::<io::Error>()
        .is_some_and(|io| is_reset_kind(io.kind()))
}

fn to_read_result(message: Result<Message, axum::Error>) -> Result<Frame, TransportError> {
    match message {
        Ok(message) => Ok(to_frame(message)),
        Err(e) => {
            let source = e.into_inner();
            if is_abnormal_closure(source.as_ref()) {
                tracing::debug!("connection dropped: {}", source);
                Ok(Frame::Reset)
            } else {
                Err(TransportError::Io(source))
            }
        }
    }
}

/// Adapt the read half of a WebSocket into the hub's frame stream.
pub fn inbound_frames(
    stream: SplitStream<WebSocket>,
) -> impl Stream<Item = Result<Frame, TransportError>> + Send + Unpin + 'static {
    stream.map(to_read_result)
}
