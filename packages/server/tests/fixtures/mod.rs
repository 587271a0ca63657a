//! Test fixtures: an in-process server on an ephemeral port.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use switchboard_server::{
    hub::{Hub, HubConfig},
    ui::{AppState, create_router},
    usecase::default_registry,
};
use tokio::{net::TcpListener, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Message, protocol::CloseFrame},
};

pub type Client = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

pub struct TestServer {
    addr: SocketAddr,
    pub hub: Arc<Hub>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(HubConfig::default()).await
    }

    pub async fn start_with(config: HubConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let hub = Arc::new(Hub::new(Arc::new(default_registry()), config));
        let app = create_router(AppState::new(Arc::clone(&hub)), &std::env::temp_dir());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self { addr, hub, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub async fn connect(&self) -> Client {
        let (client, _response) = connect_async(self.ws_url())
            .await
            .expect("Failed to connect WebSocket");
        client
    }

    /// Poll the registry until it holds `expected` sessions.
    pub async fn wait_for_sessions(&self, expected: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.hub.len().await != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("registry never reached {expected} sessions"));
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn send_json(client: &mut Client, value: serde_json::Value) {
    client
        .send(Message::Text(value.to_string().into()))
        .await
        .expect("Failed to send message");
}

pub async fn send_raw(client: &mut Client, text: &str) {
    client
        .send(Message::Text(text.to_string().into()))
        .await
        .expect("Failed to send message");
}

/// Next text frame as JSON, skipping control frames.
pub async fn recv_json(client: &mut Client) -> serde_json::Value {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("Timed out waiting for a message")
            .expect("Connection ended")
            .expect("WebSocket error");
        match message {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).expect("Invalid JSON from server");
            }
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("Expected a text frame, got {other:?}"),
        }
    }
}

/// Wait for the server's close frame.
pub async fn recv_close(client: &mut Client) -> Option<CloseFrame> {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("Timed out waiting for close");
        match message {
            Some(Ok(Message::Close(frame))) => return frame,
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
            Some(Ok(other)) => panic!("Expected a close frame, got {other:?}"),
            Some(Err(e)) => panic!("WebSocket error before close frame: {e}"),
            None => return None,
        }
    }
}
