//! Server execution logic.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::domain::{ServerError, SessionRegistry};
use crate::usecase::{
    BroadcastMessageUseCase, JoinSessionUseCase, LeaveReason, LeaveSessionUseCase,
    ListPresenceUseCase,
};

use super::{handler::handle_connection, state::AppState};

/// TCP chat hub server
///
/// Binds a listening endpoint, accepts connections and spawns one handler
/// per accepted transport. A [`ServerHandle`] obtained before `run` can stop
/// the server from another task: the accept loop unblocks, the listening
/// socket is released and every live session is force-closed.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(join, broadcast, presence, leave, registry);
/// let handle = server.handle();
/// server.run("127.0.0.1".to_string(), 1500).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    /// Registry（停止時に生きているセッションを列挙するため）
    registry: Arc<dyn SessionRegistry>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

/// Cloneable handle that stops a running [`Server`]. `stop` is idempotent.
#[derive(Clone)]
pub struct ServerHandle {
    shutdown_tx: watch::Sender<bool>,
}

impl ServerHandle {
    /// Request shutdown. Safe to call any number of times, from any task.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `join_session` - UseCase for session registration
    /// * `broadcast_message` - UseCase for message fan-out
    /// * `list_presence` - UseCase for presence queries
    /// * `leave_session` - UseCase for session teardown
    /// * `registry` - Session registry, used to enumerate live sessions at
    ///   shutdown
    pub fn new(
        join_session: Arc<JoinSessionUseCase>,
        broadcast_message: Arc<BroadcastMessageUseCase>,
        list_presence: Arc<ListPresenceUseCase>,
        leave_session: Arc<LeaveSessionUseCase>,
        registry: Arc<dyn SessionRegistry>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            state: Arc::new(AppState {
                join_session,
                broadcast_message,
                list_presence,
                leave_session,
            }),
            registry,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Obtain a handle that can stop this server once it is running.
    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            shutdown_tx: self.shutdown_tx.clone(),
        }
    }

    /// Run the chat hub server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 1500)
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::BindFailed`] if the listening endpoint cannot
    /// be acquired. Every later per-connection failure stays contained in
    /// that connection.
    pub async fn run(self, host: String, port: u16) -> Result<(), ServerError> {
        let bind_addr = format!("{}:{}", host, port);
        let listener =
            TcpListener::bind(&bind_addr)
                .await
                .map_err(|source| ServerError::BindFailed {
                    addr: bind_addr.clone(),
                    source,
                })?;
        self.serve(listener).await
    }

    /// Run the accept loop on an already-bound listener.
    ///
    /// Useful for binding to an ephemeral port first (e.g., in tests).
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!("Chat server listening on {}", addr);
        }
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        let mut shutdown_rx = self.shutdown_rx.clone();
        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        tracing::debug!("Accepted connection from {}", peer);
                        let state = self.state.clone();
                        tokio::spawn(async move {
                            handle_connection(stream, peer, state).await;
                        });
                    }
                    // Transient accept failures (e.g., out of descriptors)
                    // must never abort the loop
                    Err(err) => {
                        tracing::warn!("Failed to accept connection: {}", err);
                    }
                },
            }
        }

        // Release the listening endpoint; new connections are refused from
        // here on.
        drop(listener);

        // Force-close every live session. Detaching a session's channel ends
        // its writer task, which in turn tears down its receive loop and
        // releases the transport.
        let sessions = self.registry.snapshot().await;
        if !sessions.is_empty() {
            tracing::info!("Closing {} live session(s)", sessions.len());
        }
        for session in sessions {
            self.state
                .leave_session
                .execute(session.id, LeaveReason::Shutdown)
                .await;
        }

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
