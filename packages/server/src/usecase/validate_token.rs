//! UseCase: トークン検証（auth:validate）
//!
//! 認証前に到達できる唯一のハンドラ。成功時に Session の identity を確定し、
//! Hub の登録待ちを解除します。

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::{Identity, Payload},
    hub::{Handler, HandlerError, Hub, Session},
};

/// Identity assigned to every token until real verification exists.
pub const PLACEHOLDER_IDENTITY: &str = "example of user id";

/// Payload key carrying the token.
pub const TOKEN_FIELD: &str = "t";

/// トークン検証のユースケース
#[derive(Debug, Default)]
pub struct ValidateTokenUseCase;

impl ValidateTokenUseCase {
    pub fn new() -> Self {
        Self
    }

    /// トークンを検証し、Session を認証済みにする
    ///
    /// # Returns
    ///
    /// * `Ok(Identity)` - 認証に成功した identity
    /// * `Err(HandlerError::TokenMissing)` - `t` フィールドが無い
    pub fn execute(&self, session: &Session, data: &Payload) -> Result<Identity, HandlerError> {
        if !data.contains_key(TOKEN_FIELD) {
            return Err(HandlerError::TokenMissing);
        }

        // TODO: verify the token against an identity provider instead of accepting any value
        let identity = Identity::new(PLACEHOLDER_IDENTITY)?;
        session.authenticate(identity.clone());

        Ok(identity)
    }
}

#[async_trait]
impl Handler for ValidateTokenUseCase {
    async fn handle(
        &self,
        _hub: &Hub,
        session: &Arc<Session>,
        data: Payload,
    ) -> Result<(), HandlerError> {
        let identity = self.execute(session, &data)?;
        tracing::info!(session = %session.id(), identity = %identity, "token accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::testing::recording_session;
    use serde_json::json;

    #[test]
    fn test_validate_token_success() {
        // テスト項目: t フィールドがあれば認証され、identity が設定される
        // given (前提条件):
        let (session, _) = recording_session();
        let mut data = Payload::new();
        data.insert("t".to_string(), json!("x"));

        // when (操作):
        let result = ValidateTokenUseCase::new().execute(&session, &data);

        // then (期待する結果):
        let identity = result.unwrap();
        assert_eq!(identity.as_str(), "example of user id");
        assert_eq!(session.identity(), Some(identity));
    }

    #[test]
    fn test_validate_token_missing() {
        // テスト項目: t フィールドが無い場合は token missing エラーで、認証されない
        // given (前提条件):
        let (session, _) = recording_session();

        // when (操作):
        let result = ValidateTokenUseCase::new().execute(&session, &Payload::new());

        // then (期待する結果):
        assert!(matches!(result, Err(HandlerError::TokenMissing)));
        assert_eq!(result.unwrap_err().to_string(), "token missing");
        assert!(!session.is_authenticated());
    }
}
