//! MessagePusher trait 定義
//!
//! セッションへのメッセージ配送のインターフェース。具体的な実装は
//! Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{PushError, SessionId};

/// Channel used to hand display lines to a session's writer task.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Message Pusher trait
///
/// セッションごとの送信チャンネルを管理し、表示用の行を配送します。
/// 配送の成否が呼び出し側に見えることが重要で、`broadcast` は配送に失敗
/// したセッションの ID を返し、Broadcast Router がそれらを刈り取れるように
/// します。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Attach the channel a session's writer task drains.
    async fn attach(&self, id: SessionId, channel: PusherChannel);

    /// Detach a session's channel; dropping the sender lets the writer task
    /// finish and release the transport. No-op if already detached.
    async fn detach(&self, id: SessionId);

    /// Deliver one line to a single session.
    async fn send_to(&self, id: SessionId, line: &str) -> Result<(), PushError>;

    /// Deliver one line to every target, tolerating per-recipient failure.
    /// Returns the ids whose channel was closed (dead transport). The whole
    /// fan-out happens under one lock so no two broadcasts interleave their
    /// per-recipient deliveries.
    async fn broadcast(&self, targets: &[SessionId], line: &str) -> Vec<SessionId>;
}
