//! Wire protocol for the Idobata chat application.
//!
//! Frames are line-delimited JSON: one JSON value per line, terminated by
//! `\n`. The first frame a client sends is a bare JSON string carrying its
//! display name; every frame after that is a [`ChatMessage`]. The server
//! answers with bare JSON strings holding preformatted display lines.

use std::io;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const LINE_ENDINGS: &[char] = &['\n', '\r'];

/// Kind of a protocol event sent by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// A chat line to relay to every connected client
    Text,
    /// The client is leaving; the server closes the session
    Logout,
    /// Presence query: "who is currently connected"
    WhoIsIn,
}

/// One protocol event. Immutable once constructed; `body` is empty for
/// `Logout` and `WhoIsIn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub kind: MessageKind,
    #[serde(default)]
    pub body: String,
}

impl ChatMessage {
    pub fn new(kind: MessageKind, body: impl Into<String>) -> Self {
        Self {
            kind,
            body: body.into(),
        }
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self::new(MessageKind::Text, body)
    }

    pub fn logout() -> Self {
        Self::new(MessageKind::Logout, "")
    }

    pub fn who_is_in() -> Self {
        Self::new(MessageKind::WhoIsIn, "")
    }
}

/// Read the next frame from `reader`.
///
/// Returns `Ok(None)` when the peer closed the connection cleanly. Blank
/// lines are skipped. An undecodable line surfaces as
/// `io::ErrorKind::InvalidData`.
pub async fn read_frame<R, T>(reader: &mut R) -> io::Result<Option<T>>
where
    R: AsyncBufRead + Unpin,
    T: DeserializeOwned,
{
    let mut line = String::new();
    loop {
        line.clear();
        let bytes = reader.read_line(&mut line).await?;
        if bytes == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(LINE_ENDINGS);
        if trimmed.is_empty() {
            continue;
        }

        let parsed = serde_json::from_str(trimmed).map_err(to_io_error)?;
        return Ok(Some(parsed));
    }
}

/// Write one frame to `writer` and flush it so peers get timely updates.
pub async fn write_frame<W, T>(writer: &mut W, value: &T) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut encoded = serde_json::to_vec(value).map_err(to_io_error)?;
    encoded.push(b'\n');
    writer.write_all(&encoded).await?;
    writer.flush().await?;
    Ok(())
}

fn to_io_error(err: serde_json::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}
