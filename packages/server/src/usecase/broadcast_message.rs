//! UseCase: メッセージのブロードキャスト処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - BroadcastMessageUseCase::execute() メソッド
//! - 整形済みの行がスナップショット内の全セッションに配送されること
//! - 配送に失敗したセッションが Registry から刈り取られること
//!
//! ### なぜこのテストが必要か
//! - ブロードキャストはこのシステムの中核経路であり、送信者を含む全員への
//!   到達と、死んだセッションの確実な除去の両方を保証する必要がある
//! - 一部の配送失敗が残りの受信者への配送を妨げないことを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系: 複数セッションへの配送
//! - 異常系: チャンネルが閉じたセッションが混ざっている場合
//! - エッジケース: 送信元が既に刈り取られている場合

use std::sync::Arc;

use idobata_shared::time::{Clock, format_clock_time};

use crate::domain::{MessagePusher, SessionId, SessionRegistry};

/// メッセージブロードキャストのユースケース
pub struct BroadcastMessageUseCase {
    /// Registry（セッション管理の抽象化）
    registry: Arc<dyn SessionRegistry>,
    /// MessagePusher（メッセージ配送の抽象化）
    pusher: Arc<dyn MessagePusher>,
    /// Clock（現在時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl BroadcastMessageUseCase {
    /// 新しい BroadcastMessageUseCase を作成
    pub fn new(
        registry: Arc<dyn SessionRegistry>,
        pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            pusher,
            clock,
        }
    }

    /// ブロードキャストを実行
    ///
    /// `"<HH:mm:ss> <表示名>: <本文>"` に整形した行を、スナップショット内の
    /// 全セッション（送信元を含む。クライアントは自分の発言をローカルには
    /// 表示しない）に配送します。配送に失敗したセッションは Registry から
    /// 削除し、残りのセッションへの配送は継続します。
    ///
    /// # Arguments
    ///
    /// * `origin` - 送信元セッションの ID
    /// * `text` - チャット本文
    pub async fn execute(&self, origin: SessionId, text: &str) {
        let Some(sender) = self.registry.find(origin).await else {
            // 読み取りループと刈り取りの競合。送信元は既に閉じられている
            tracing::warn!("Ignoring message from unknown session {}", origin);
            return;
        };

        let line = format!(
            "{} {}: {}",
            format_clock_time(self.clock.now_millis()),
            sender.username,
            text
        );
        tracing::info!("{}", line);

        let snapshot = self.registry.snapshot().await;
        let targets: Vec<SessionId> = snapshot.iter().map(|s| s.id).collect();
        let failed = self.pusher.broadcast(&targets, &line).await;

        for id in failed {
            if let Some(dead) = self.registry.unregister(id).await {
                self.pusher.detach(id).await;
                tracing::warn!(
                    "Disconnected client {} (session {}) removed from list",
                    dead.username,
                    id
                );
            }
        }
    }
}
