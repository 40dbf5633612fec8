//! チャンネルを使った MessagePusher 実装
//!
//! ## 責務
//!
//! - セッションごとの `UnboundedSender` を管理
//! - セッションへの行の配送（send_to, broadcast）
//!
//! ## 設計ノート
//!
//! チャンネルの生成は UI 層（接続ハンドラ）で行われます。この実装は生成
//! された `UnboundedSender` を受け取り、配送に使用します。受信側はその
//! セッションの writer タスクが持ち、ソケットへの書き込みに失敗した時点で
//! チャンネルを閉じます。そのため `send` の失敗は「そのセッションの
//! トランスポートは死んでいる」ことを意味し、`broadcast` はそのような
//! セッションの ID を呼び出し側に返します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{MessagePusher, PushError, PusherChannel, SessionId};

/// チャンネルを使った MessagePusher 実装
pub struct ChannelMessagePusher {
    /// 接続中のセッションの sender
    ///
    /// Key: session id
    /// Value: PusherChannel
    channels: Mutex<HashMap<u64, PusherChannel>>,
}

impl ChannelMessagePusher {
    /// 新しい ChannelMessagePusher を作成
    pub fn new() -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for ChannelMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for ChannelMessagePusher {
    async fn attach(&self, id: SessionId, channel: PusherChannel) {
        let mut channels = self.channels.lock().await;
        channels.insert(id.value(), channel);
        tracing::debug!("Session {} attached to MessagePusher", id);
    }

    async fn detach(&self, id: SessionId) {
        let mut channels = self.channels.lock().await;
        channels.remove(&id.value());
        tracing::debug!("Session {} detached from MessagePusher", id);
    }

    async fn send_to(&self, id: SessionId, line: &str) -> Result<(), PushError> {
        let channels = self.channels.lock().await;

        if let Some(sender) = channels.get(&id.value()) {
            sender
                .send(line.to_string())
                .map_err(|_| PushError::ChannelClosed(id))?;
            tracing::debug!("Pushed line to session {}", id);
            Ok(())
        } else {
            Err(PushError::SessionNotFound(id))
        }
    }

    async fn broadcast(&self, targets: &[SessionId], line: &str) -> Vec<SessionId> {
        // ロックをループ全体で保持し、二つの broadcast の配送が交互に
        // 混ざらないようにする
        let channels = self.channels.lock().await;

        let mut failed = Vec::new();
        for target in targets {
            match channels.get(&target.value()) {
                Some(sender) => {
                    if sender.send(line.to_string()).is_err() {
                        tracing::warn!("Failed to push line to session {}", target);
                        failed.push(*target);
                    } else {
                        tracing::debug!("Broadcasted line to session {}", target);
                    }
                }
                None => {
                    // 既に detach 済み。刈り取りは済んでいるのでスキップ
                    tracing::debug!("Session {} not attached during broadcast, skipping", target);
                }
            }
        }

        failed
    }
}
