//! SessionRegistry trait 定義
//!
//! ドメイン層が必要とするセッション管理のインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Session, SessionId, Timestamp, Username};

/// Session Registry trait
///
/// 接続中のセッションを管理する共有コレクションへのインターフェース。
/// すべての変更（register / unregister）とスナップショット取得は互いに
/// 排他的で、並行する削除とイテレーションが衝突することはありません。
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Assign the next monotonically increasing id, store the session and
    /// return it. Ids are assigned in registration order and never reused.
    async fn register(&self, username: Username, connected_at: Timestamp) -> Session;

    /// Remove the session with that id. Returns the removed session, or
    /// `None` if it was already gone — concurrent removal from two triggers
    /// (explicit logout and broadcast-detected dead socket) is expected and
    /// must not fail.
    async fn unregister(&self, id: SessionId) -> Option<Session>;

    /// A stable copy of the current sessions in id (= registration) order.
    /// Delivery iteration over the copy never observes a registry mutated
    /// mid-iteration; the same order numbers the presence listing.
    async fn snapshot(&self) -> Vec<Session>;

    /// Look up a single session by id.
    async fn find(&self, id: SessionId) -> Option<Session>;

    /// 接続中のセッション数を取得
    async fn count(&self) -> usize;
}
