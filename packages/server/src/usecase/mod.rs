//! UseCase 層
//!
//! 個々のメッセージハンドラを実装するレイヤー。
//! Hub のディスパッチループから呼び出され、Session と Hub を操作します。

pub mod send_chat_message;
pub mod validate_token;

pub use send_chat_message::SendChatMessageUseCase;
pub use validate_token::ValidateTokenUseCase;

use crate::{domain::Kind, hub::HandlerRegistry};

/// Registry with every handler this server ships with.
pub fn default_registry() -> HandlerRegistry {
    HandlerRegistry::builder()
        .route(Kind::bootstrap(), ValidateTokenUseCase::new())
        .route(SendChatMessageUseCase::kind(), SendChatMessageUseCase::new())
        .build()
}
