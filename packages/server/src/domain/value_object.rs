//! 値オブジェクト定義
//!
//! ドメイン層で使う小さな不変値。生成時に検証を行い、以降は常に正しい値
//! であることを保証します。

use std::fmt;

use super::error::EmptyUsername;

/// Process-unique session identifier.
///
/// Assigned by the registry when a session is registered; strictly
/// increasing, never reused within a server process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name supplied by the client at handshake, immutable thereafter.
///
/// Leading/trailing whitespace is trimmed; an empty name is rejected.
/// Duplicate names across sessions are allowed, ids keep sessions distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn new(raw: impl Into<String>) -> Result<Self, EmptyUsername> {
        let trimmed = raw.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(EmptyUsername);
        }
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_trims_whitespace() {
        // テスト項目: ユーザー名の前後の空白が除去される
        // given (前提条件):
        let raw = "  alice  ";

        // when (操作):
        let username = Username::new(raw).unwrap();

        // then (期待する結果):
        assert_eq!(username.as_str(), "alice");
    }

    #[test]
    fn test_username_rejects_empty() {
        // テスト項目: 空のユーザー名は拒否される
        // given (前提条件):
        let raw = "   ";

        // when (操作):
        let result = Username::new(raw);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_session_id_ordering_follows_value() {
        // テスト項目: SessionId の大小関係は内部値に従う
        // given (前提条件):
        let first = SessionId::new(1);
        let second = SessionId::new(2);

        // when (操作) / then (期待する結果):
        assert!(first < second);
        assert_eq!(first, SessionId::new(1));
    }
}
