//! Error types for the chat hub server.

use thiserror::Error;

use super::value_object::SessionId;

/// Fatal server-level errors. Everything per-session stays contained in that
/// session's lifecycle and never reaches the accept loop.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening endpoint could not be acquired at startup
    #[error("failed to bind listening endpoint {addr}: {source}")]
    BindFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Per-session errors; recoverable — the affected connection is closed and
/// the server keeps running.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The transport closed or sent garbage before the display name arrived
    #[error("connection closed before the display name arrived")]
    HandshakeFailed,

    /// The transport closed or errored during send or receive
    #[error("transport closed: {0}")]
    TransportClosed(String),

    /// An undecodable frame arrived after the handshake
    #[error("malformed frame: {0}")]
    MalformedMessage(String),
}

/// Delivery errors reported by the [`MessagePusher`](super::MessagePusher).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PushError {
    /// No channel is attached for that session (already detached)
    #[error("session {0} has no attached channel")]
    SessionNotFound(SessionId),

    /// The session's channel is closed; its transport is dead
    #[error("channel for session {0} is closed")]
    ChannelClosed(SessionId),
}

/// A display name was empty after trimming.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("display name must not be empty")]
pub struct EmptyUsername;
