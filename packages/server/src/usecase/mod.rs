//! UseCase 層
//!
//! セッションのライフサイクル（join / leave）とメッセージのルーティング
//! （broadcast / presence）のビジネスロジックを提供します。Repository と
//! Pusher の trait にのみ依存し、具体的な実装には依存しません。

mod broadcast_message;
mod join_session;
mod leave_session;
mod list_presence;

pub use broadcast_message::BroadcastMessageUseCase;
pub use join_session::JoinSessionUseCase;
pub use leave_session::{LeaveReason, LeaveSessionUseCase};
pub use list_presence::ListPresenceUseCase;
