//! UseCase: セッション接続処理
//!
//! ハンドシェイク（表示名の受信）が完了した接続を登録し、配送チャンネルを
//! 取り付けます。ID の払い出しは Registry がハンドシェイク完了順に行います。

use std::sync::Arc;

use idobata_shared::time::Clock;

use crate::domain::{MessagePusher, PusherChannel, Session, SessionRegistry, Timestamp, Username};

/// セッション接続のユースケース
pub struct JoinSessionUseCase {
    /// Registry（セッション管理の抽象化）
    registry: Arc<dyn SessionRegistry>,
    /// MessagePusher（メッセージ配送の抽象化）
    pusher: Arc<dyn MessagePusher>,
    /// Clock（現在時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl JoinSessionUseCase {
    /// 新しい JoinSessionUseCase を作成
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

    /// セッション接続を実行
    ///
    /// # Arguments
    ///
    /// * `username` - クライアントが名乗った表示名（検証済み）
    /// * `channel` - このセッションの writer タスクへの送信チャンネル
    ///
    /// # Returns
    ///
    /// 登録された `Session`（ID と接続時刻が確定済み）
    pub async fn execute(&self, username: Username, channel: PusherChannel) -> Session {
        let connected_at = Timestamp::new(self.clock.now_millis());
        let session = self.registry.register(username, connected_at).await;
        self.pusher.attach(session.id, channel).await;

        tracing::info!("{} just connected (session {})", session.username, session.id);

        session
    }
}
