//! Server state shared with connection handlers.

use std::sync::Arc;

use crate::usecase::{
    BroadcastMessageUseCase, JoinSessionUseCase, LeaveSessionUseCase, ListPresenceUseCase,
};

/// Shared application state
pub struct AppState {
    /// JoinSessionUseCase（セッション接続のユースケース）
    pub join_session: Arc<JoinSessionUseCase>,
    /// BroadcastMessageUseCase（メッセージブロードキャストのユースケース）
    pub broadcast_message: Arc<BroadcastMessageUseCase>,
    /// ListPresenceUseCase（在席一覧のユースケース）
    pub list_presence: Arc<ListPresenceUseCase>,
    /// LeaveSessionUseCase（セッション切断のユースケース）
    pub leave_session: Arc<LeaveSessionUseCase>,
}
