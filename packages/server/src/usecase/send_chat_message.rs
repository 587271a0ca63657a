//! UseCase: チャットメッセージ送信（chat:send_msg）
//!
//! 受け取ったメッセージを `chat:receive_msg` として送信者自身の identity に
//! ブロードキャストします。

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    domain::{Envelope, Kind, Payload},
    hub::{BroadcastReport, Handler, HandlerError, Hub, Session},
};

/// Payload key carrying the chat message.
pub const MESSAGE_FIELD: &str = "message";

/// チャットメッセージ送信のユースケース
#[derive(Debug, Default)]
pub struct SendChatMessageUseCase;

impl SendChatMessageUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Kind this use case is registered under.
    pub fn kind() -> Kind {
        Kind::from_static("chat", "send_msg")
    }

    /// Kind of the envelope delivered to recipients.
    pub fn receive_kind() -> Kind {
        Kind::from_static("chat", "receive_msg")
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(BroadcastReport)` - 配信結果（個々の送信失敗はエラーにしない）
    /// * `Err(HandlerError)` - message フィールドが無い、または文字列でない
    pub async fn execute(
        &self,
        hub: &Hub,
        session: &Session,
        data: &Payload,
    ) -> Result<BroadcastReport, HandlerError> {
        // 1. 入力の検証
        let message = data
            .get(MESSAGE_FIELD)
            .ok_or(HandlerError::MessageMissing)?
            .as_str()
            .ok_or(HandlerError::InvalidField {
                field: MESSAGE_FIELD,
            })?;
        let sender = session.identity().ok_or(HandlerError::Unauthenticated)?;

        // 2. 送信者自身にブロードキャスト
        let mut payload = Payload::new();
        payload.insert(MESSAGE_FIELD.to_string(), Value::String(message.to_string()));
        let envelope = Envelope::new(&Self::receive_kind(), payload);

        Ok(hub.broadcast(&envelope, &[sender]).await)
    }
}

#[async_trait]
impl Handler for SendChatMessageUseCase {
    async fn handle(
        &self,
        hub: &Hub,
        session: &Arc<Session>,
        data: Payload,
    ) -> Result<(), HandlerError> {
        let report = self.execute(hub, session, &data).await?;
        tracing::debug!(
            session = %session.id(),
            delivered = report.delivered,
            failed = report.failed,
            "chat message broadcast"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::Identity,
        hub::{
            Registration,
            testing::{empty_hub, recording_session},
        },
    };
    use serde_json::json;

    #[tokio::test]
    async fn test_send_chat_message_to_sender_only() {
        // テスト項目: メッセージは chat:receive_msg として送信者自身にのみ届く
        // given (前提条件):
        let hub = empty_hub();
        let (alice, alice_transport) = recording_session();
        alice.authenticate(Identity::new("alice").unwrap());
        assert!(matches!(
            hub.register(&alice).await,
            Registration::Authenticated(_)
        ));
        let (bob, bob_transport) = recording_session();
        bob.authenticate(Identity::new("bob").unwrap());
        hub.register(&bob).await;

        let mut data = Payload::new();
        data.insert("message".to_string(), json!("hi"));

        // when (操作):
        let report = SendChatMessageUseCase::new()
            .execute(&hub, &alice, &data)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        let received: Vec<Value> = alice_transport
            .sent()
            .iter()
            .map(|text| serde_json::from_str(text).unwrap())
            .collect();
        assert_eq!(
            received,
            vec![json!({"kind": "chat:receive_msg", "data": {"message": "hi"}})]
        );
        assert!(bob_transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_send_chat_message_missing_message() {
        // テスト項目: message フィールドが無い場合は message missing エラー
        // given (前提条件):
        let hub = empty_hub();
        let (session, transport) = recording_session();
        session.authenticate(Identity::new("alice").unwrap());

        // when (操作):
        let result = SendChatMessageUseCase::new()
            .execute(&hub, &session, &Payload::new())
            .await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err().to_string(), "message missing");
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_send_chat_message_non_string_message() {
        // テスト項目: message が文字列でない場合はエラー
        let hub = empty_hub();
        let (session, _) = recording_session();
        session.authenticate(Identity::new("alice").unwrap());
        let mut data = Payload::new();
        data.insert("message".to_string(), json!(42));

        let result = SendChatMessageUseCase::new()
            .execute(&hub, &session, &data)
            .await;

        assert_eq!(result.unwrap_err().to_string(), "message must be a string");
    }

    #[tokio::test]
    async fn test_send_chat_message_unregistered_sender_is_skipped() {
        // テスト項目: 送信者が registry に無い場合はスキップされるだけでエラーにならない
        let hub = empty_hub();
        let (session, transport) = recording_session();
        session.authenticate(Identity::new("alice").unwrap());
        let mut data = Payload::new();
        data.insert("message".to_string(), json!("hi"));

        let report = SendChatMessageUseCase::new()
            .execute(&hub, &session, &data)
            .await
            .unwrap();

        assert_eq!(report.skipped, 1);
        assert!(transport.sent().is_empty());
    }
}
