//! Interactive TCP chat client.
//!
//! Connects to an Idobata chat hub, sends the display name and then relays
//! lines typed at the prompt. `LOGOUT` leaves the chat, `WHOISIN` lists the
//! connected users.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin idobata-client -- --username Alice
//! cargo run --bin idobata-client -- -u Bob -H 192.168.0.10 -p 1500
//! ```

use clap::Parser;

use idobata_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "idobata-client")]
#[command(about = "Interactive TCP chat client", long_about = None)]
struct Args {
    /// Server host to connect to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to connect to
    #[arg(short = 'p', long, default_value = "1500")]
    port: u16,

    /// Display name to connect as
    #[arg(short = 'u', long, default_value = "Anonymous")]
    username: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();

    // Run the client
    if let Err(e) = idobata_client::run_client(args.host, args.port, args.username).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
