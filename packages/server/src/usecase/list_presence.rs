//! UseCase: 在席一覧（presence query）処理
//!
//! "誰が接続中か" を問い合わせたセッションにだけ、ヘッダ行と番号付きの
//! 一覧を返します。番号はスナップショットの順序（= 登録順）に振られます。

use std::sync::Arc;

use idobata_shared::time::{Clock, format_clock_time, format_full_date};

use crate::domain::{MessagePusher, SessionId, SessionRegistry};

/// 在席一覧のユースケース
pub struct ListPresenceUseCase {
    /// Registry（セッション管理の抽象化）
    registry: Arc<dyn SessionRegistry>,
    /// MessagePusher（メッセージ配送の抽象化）
    pusher: Arc<dyn MessagePusher>,
    /// Clock（現在時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl ListPresenceUseCase {
    /// 新しい ListPresenceUseCase を作成
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

    /// 在席一覧の配送を実行
    ///
    /// 要求したセッションにのみ、以下の形の行を順に送ります:
    ///
    /// ```text
    /// List of the users connected at <HH:mm:ss>
    /// 1) alice since <date>
    /// 2) bob since <date>
    /// ```
    ///
    /// 配送に失敗しても Registry は変更しません。死んだソケットの回収は
    /// そのセッション自身の読み取りループか、次のブロードキャストが行います。
    pub async fn execute(&self, requester: SessionId) {
        let snapshot = self.registry.snapshot().await;

        let header = format!(
            "List of the users connected at {}",
            format_clock_time(self.clock.now_millis())
        );
        let mut lines = vec![header];
        for (index, session) in snapshot.iter().enumerate() {
            lines.push(format!(
                "{}) {} since {}",
                index + 1,
                session.username,
                format_full_date(session.connected_at.value())
            ));
        }

        for line in lines {
            if let Err(err) = self.pusher.send_to(requester, &line).await {
                tracing::warn!(
                    "Failed to deliver presence listing to session {}: {}",
                    requester,
                    err
                );
                break;
            }
        }
    }
}
