//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not reach the server at all
    #[error("error connecting to server {addr}: {source}")]
    ConnectionFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The established connection broke
    #[error("connection to the server was lost: {0}")]
    ConnectionLost(String),

    /// The interactive line editor failed
    #[error("terminal input error: {0}")]
    InputError(String),
}
