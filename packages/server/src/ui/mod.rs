//! UI 層: HTTP / WebSocket のエンドポイントとサーバー起動処理。

mod handler;
mod router;
mod runner;
mod signal;
pub mod state;

pub use router::create_router;
pub use runner::run;
pub use state::AppState;
