//! UseCase: セッション切断処理
//!
//! セッションのライフサイクルの終端。Registry から削除し、配送チャンネルを
//! 取り外し、切断イベントを記録します。明示的な LOGOUT・読み取りエラー・
//! サーバ停止のどの経路から呼ばれても安全（冪等）です。

use std::sync::Arc;

use crate::domain::{MessagePusher, Session, SessionId, SessionRegistry};

/// セッションが閉じられた理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveReason {
    /// クライアントが LOGOUT メッセージを送った
    Logout,
    /// トランスポートが閉じられた／エラーになった
    ConnectionLost,
    /// サーバ停止による強制切断
    Shutdown,
}

/// セッション切断のユースケース
pub struct LeaveSessionUseCase {
    /// Registry（セッション管理の抽象化）
    registry: Arc<dyn SessionRegistry>,
    /// MessagePusher（メッセージ配送の抽象化）
    pusher: Arc<dyn MessagePusher>,
}

impl LeaveSessionUseCase {
    /// 新しい LeaveSessionUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>, pusher: Arc<dyn MessagePusher>) -> Self {
        Self { registry, pusher }
    }

    /// セッション切断を実行
    ///
    /// # Arguments
    ///
    /// * `id` - 切断するセッションの ID
    /// * `reason` - 切断理由（ログ用）
    ///
    /// # Returns
    ///
    /// 削除されたセッション。既に削除済みだった場合は `None`（no-op）。
    pub async fn execute(&self, id: SessionId, reason: LeaveReason) -> Option<Session> {
        let Some(session) = self.registry.unregister(id).await else {
            // ブロードキャストの刈り取りや停止処理と競合した場合
            tracing::debug!("Session {} already removed", id);
            return None;
        };
        self.pusher.detach(id).await;

        match reason {
            LeaveReason::Logout => {
                tracing::info!("{} disconnected with a LOGOUT message", session.username);
            }
            LeaveReason::ConnectionLost => {
                tracing::info!("{} disconnected: connection lost", session.username);
            }
            LeaveReason::Shutdown => {
                tracing::info!("{} disconnected: server shutting down", session.username);
            }
        }

        Some(session)
    }
}
