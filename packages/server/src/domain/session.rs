//! Session エンティティ定義

use super::value_object::{SessionId, Timestamp, Username};

/// The server-side representative of one connected client.
///
/// A `Session` exists in the registry exactly while its client is active:
/// it is registered once the handshake (receipt of the display name)
/// completes and removed when the session closes, whether through a logout
/// message, a transport error or a server shutdown. The underlying transport
/// is owned exclusively by that connection's tasks, never by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Registry-assigned identifier, unique per process
    pub id: SessionId,
    /// Display name chosen by the client at handshake
    pub username: Username,
    /// When the session was registered
    pub connected_at: Timestamp,
}

impl Session {
    pub fn new(id: SessionId, username: Username, connected_at: Timestamp) -> Self {
        Self {
            id,
            username,
            connected_at,
        }
    }
}
