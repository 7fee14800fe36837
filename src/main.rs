//! Ghostline - Main Entry Point
//!
//! AI code completion language server:
//! - `ghostline` or `ghostline lsp` - Start the LSP server on stdio

use ghostline::config::Config;
use ghostline::server;

#[tokio::main]
async fn main() {
    let config = Config::from_args().expect("Failed to load configuration");

    // stdout carries the LSP protocol, so logs go to stderr
    let log_level = match config.server.log_level.as_str() {
        "error" => tracing::Level::ERROR,
        "warn" => tracing::Level::WARN,
        "info" => tracing::Level::INFO,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Ghostline LSP server starting...");
    tracing::info!(
        "Configuration: idle delay {}ms, model {}",
        config.debounce.idle_delay_ms,
        config.groq.model
    );

    server::run(config).await;
}
