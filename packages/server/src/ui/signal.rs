//! Shutdown signal handling.

/// Completes when the operator asks the process to stop (Ctrl+C).
pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to install Ctrl+C handler: {}", err);
    }
}
