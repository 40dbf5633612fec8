//! Chat client session management.
//!
//! Connects to the hub, performs the display-name handshake, then runs two
//! halves side by side: a task printing every line the server pushes, and
//! the interactive input loop turning typed lines into protocol messages.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::io::BufReader;
use tokio::net::TcpStream;

use idobata_shared::protocol::{ChatMessage, MessageKind, read_frame, write_frame};

use crate::error::ClientError;

use super::ui::redisplay_prompt;

/// Run the chat client session
///
/// # Arguments
///
/// * `host` - Server host to connect to
/// * `port` - Server port
/// * `username` - Display name sent during the handshake
pub async fn run_client(host: String, port: u16, username: String) -> Result<(), ClientError> {
    let addr = format!("{}:{}", host, port);
    let stream = TcpStream::connect(&addr)
        .await
        .map_err(|source| ClientError::ConnectionFailed {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("Connection accepted {}", addr);

    let (read_half, mut write_half) = stream.into_split();

    // Handshake: the display name goes first, before any other traffic
    write_frame(&mut write_half, &username)
        .await
        .map_err(|err| ClientError::ConnectionLost(err.to_string()))?;

    println!(
        "\nYou are '{}'. Type messages and press Enter to send.",
        username
    );
    println!("Commands: LOGOUT to leave, WHOISIN to list connected users.\n");

    // Task printing every line the server pushes
    let username_for_read = username.clone();
    let read_task = tokio::spawn(async move {
        let mut reader = BufReader::new(read_half);
        loop {
            match read_frame::<_, String>(&mut reader).await {
                Ok(Some(line)) => {
                    println!("{}", line);
                    redisplay_prompt(&username_for_read);
                }
                Ok(None) => {
                    println!("Server has closed the connection.");
                    break;
                }
                Err(err) => {
                    tracing::warn!("Lost connection to server: {}", err);
                    break;
                }
            }
        }
    });

    // Interactive input loop
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            read_task.abort();
            return Err(ClientError::InputError(err.to_string()));
        }
    };
    let prompt = format!("{}> ", username);

    loop {
        match editor.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                // Command words mirror what the server understands
                let message = if trimmed.eq_ignore_ascii_case("LOGOUT") {
                    ChatMessage::logout()
                } else if trimmed.eq_ignore_ascii_case("WHOISIN") {
                    ChatMessage::who_is_in()
                } else {
                    ChatMessage::text(trimmed)
                };
                let leaving = message.kind == MessageKind::Logout;

                if write_frame(&mut write_half, &message).await.is_err() {
                    tracing::warn!("Failed to send; the connection appears closed");
                    break;
                }
                if leaving {
                    break;
                }
            }
            // Ctrl+C / Ctrl+D leave the chat like a LOGOUT
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                let _ = write_frame(&mut write_half, &ChatMessage::logout()).await;
                break;
            }
            Err(err) => {
                read_task.abort();
                return Err(ClientError::InputError(err.to_string()));
            }
        }
    }

    read_task.abort();
    Ok(())
}
