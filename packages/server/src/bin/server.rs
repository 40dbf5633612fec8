//! TCP chat hub server.
//!
//! Accepts client connections, registers a session per client and relays
//! each client's messages to every connected session.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin idobata-server
//! cargo run --bin idobata-server -- --host 0.0.0.0 --port 1500
//! ```

use std::sync::Arc;

use clap::Parser;

use idobata_server::{
    domain::{MessagePusher, SessionRegistry},
    infrastructure::{ChannelMessagePusher, InMemorySessionRegistry},
    ui::{Server, shutdown_signal},
    usecase::{
        BroadcastMessageUseCase, JoinSessionUseCase, LeaveSessionUseCase, ListPresenceUseCase,
    },
};
use idobata_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "idobata-server")]
#[command(about = "TCP chat hub server with broadcast support", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "1500")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Registry / MessagePusher / Clock
    // 2. UseCases
    // 3. Server

    // 1. Shared infrastructure
    let registry: Arc<dyn SessionRegistry> = Arc::new(InMemorySessionRegistry::new());
    let pusher: Arc<dyn MessagePusher> = Arc::new(ChannelMessagePusher::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // 2. Create UseCases
    let join_session = Arc::new(JoinSessionUseCase::new(
        registry.clone(),
        pusher.clone(),
        clock.clone(),
    ));
    let broadcast_message = Arc::new(BroadcastMessageUseCase::new(
        registry.clone(),
        pusher.clone(),
        clock.clone(),
    ));
    let list_presence = Arc::new(ListPresenceUseCase::new(
        registry.clone(),
        pusher.clone(),
        clock.clone(),
    ));
    let leave_session = Arc::new(LeaveSessionUseCase::new(registry.clone(), pusher.clone()));

    // 3. Create and run the server
    let server = Server::new(
        join_session,
        broadcast_message,
        list_presence,
        leave_session,
        registry,
    );

    // Stop the accept loop when the operator hits Ctrl+C
    let handle = server.handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        handle.stop();
    });

    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
