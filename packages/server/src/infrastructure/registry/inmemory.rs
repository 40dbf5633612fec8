//! InMemory SessionRegistry 実装
//!
//! ドメイン層が定義する SessionRegistry trait の具体的な実装。
//! 単一の Mutex が ID カウンタとセッションマップの両方を守るため、
//! 登録・削除・スナップショット取得が互いに割り込むことはなく、ID は
//! 登録が成功した順にちょうど 1 ずつ増えます。

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::domain::{Session, SessionId, SessionRegistry, Timestamp, Username};

struct RegistryInner {
    /// 次に払い出すセッション ID
    next_id: u64,
    /// id → Session。BTreeMap の走査順が登録順（= ID 順）になる
    sessions: BTreeMap<u64, Session>,
}

/// インメモリ SessionRegistry 実装
pub struct InMemorySessionRegistry {
    inner: Mutex<RegistryInner>,
}

impl InMemorySessionRegistry {
    /// 新しい InMemorySessionRegistry を作成
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                next_id: 1,
                sessions: BTreeMap::new(),
            }),
        }
    }
}

impl Default for InMemorySessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn register(&self, username: Username, connected_at: Timestamp) -> Session {
        let mut inner = self.inner.lock().await;
        let id = SessionId::new(inner.next_id);
        inner.next_id += 1;

        let session = Session::new(id, username, connected_at);
        inner.sessions.insert(id.value(), session.clone());
        session
    }

    async fn unregister(&self, id: SessionId) -> Option<Session> {
        let mut inner = self.inner.lock().await;
        inner.sessions.remove(&id.value())
    }

    async fn snapshot(&self) -> Vec<Session> {
        let inner = self.inner.lock().await;
        inner.sessions.values().cloned().collect()
    }

    async fn find(&self, id: SessionId) -> Option<Session> {
        let inner = self.inner.lock().await;
        inner.sessions.get(&id.value()).cloned()
    }

    async fn count(&self) -> usize {
        let inner = self.inner.lock().await;
        inner.sessions.len()
    }
}
