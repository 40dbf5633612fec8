//! Per-connection handling.
//!
//! Each accepted transport goes through the same lifecycle: the handshake
//! reads the display name, the session is registered, and two tasks run
//! until either side ends — a writer task draining this session's channel
//! into the socket, and a receive loop decoding the client's frames. When
//! one task finishes the other is aborted, the transport is released and
//! the session leaves the registry.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use idobata_shared::protocol::{ChatMessage, MessageKind, read_frame, write_frame};

use crate::domain::{SessionError, SessionId, Username};
use crate::usecase::LeaveReason;

use super::state::AppState;

pub async fn handle_connection(stream: TcpStream, peer: SocketAddr, state: Arc<AppState>) {
    let (read_half, write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    // Handshake: the very first frame carries the display name. A connection
    // that closes or sends garbage before that is dropped without touching
    // the registry; the accept loop keeps running.
    let username = match read_handshake(&mut reader).await {
        Ok(username) => username,
        Err(err) => {
            tracing::warn!("Handshake with {} failed: {}", peer, err);
            return;
        }
    };

    // Create a channel for this session to receive display lines
    let (tx, rx) = mpsc::unbounded_channel();
    let session = state.join_session.execute(username, tx).await;
    let session_id = session.id;

    // Writer task: drains the channel into the socket
    let mut send_task = pusher_loop(rx, write_half);

    // Receive loop: decodes and dispatches this client's frames
    let state_for_read = state.clone();
    let mut recv_task: JoinHandle<LeaveReason> =
        tokio::spawn(async move { read_loop(reader, session_id, state_for_read).await });

    // Whichever side finishes first aborts the other; both socket halves are
    // released once the tasks are gone.
    let reason = tokio::select! {
        finished = &mut recv_task => {
            send_task.abort();
            finished.unwrap_or(LeaveReason::ConnectionLost)
        }
        _ = &mut send_task => {
            recv_task.abort();
            LeaveReason::ConnectionLost
        }
    };

    // No-op if the session was already pruned or force-closed.
    state.leave_session.execute(session_id, reason).await;
}

async fn read_handshake<R>(reader: &mut R) -> Result<Username, SessionError>
where
    R: AsyncBufRead + Unpin,
{
    match read_frame::<_, String>(reader).await {
        Ok(Some(raw)) => Username::new(raw).map_err(|_| SessionError::HandshakeFailed),
        Ok(None) => Err(SessionError::HandshakeFailed),
        Err(_) => Err(SessionError::HandshakeFailed),
    }
}

/// Spawns the task that forwards queued display lines to this client.
///
/// A socket write error ends the task; from then on the closed channel makes
/// every further delivery attempt report this session dead, so the broadcast
/// router prunes it.
fn pusher_loop(mut rx: mpsc::UnboundedReceiver<String>, mut writer: OwnedWriteHalf) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if write_frame(&mut writer, &line).await.is_err() {
                break;
            }
        }
    })
}

async fn read_loop<R>(mut reader: R, session_id: SessionId, state: Arc<AppState>) -> LeaveReason
where
    R: AsyncBufRead + Unpin,
{
    loop {
        match read_frame::<_, ChatMessage>(&mut reader).await {
            Ok(Some(message)) => match message.kind {
                MessageKind::Text => {
                    state
                        .broadcast_message
                        .execute(session_id, &message.body)
                        .await;
                }
                MessageKind::WhoIsIn => {
                    state.list_presence.execute(session_id).await;
                }
                MessageKind::Logout => return LeaveReason::Logout,
            },
            // Peer closed the stream without a logout message
            Ok(None) => return LeaveReason::ConnectionLost,
            // A malformed frame terminates the session the same way a dead
            // transport does; the rest of the server is unaffected
            Err(err) => {
                let session_err = if err.kind() == io::ErrorKind::InvalidData {
                    SessionError::MalformedMessage(err.to_string())
                } else {
                    SessionError::TransportClosed(err.to_string())
                };
                tracing::warn!("Dropping session {}: {}", session_id, session_err);
                return LeaveReason::ConnectionLost;
            }
        }
    }
}
