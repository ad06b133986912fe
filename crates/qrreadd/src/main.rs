//! qrreadd - QR reading server daemon
//!
//! Accepts image uploads over HTTP and returns the decoded QR text as JSON.
//!
//! Usage:
//!   PORT=<port> qrreadd [OPTIONS] [config.toml]
//!
//! The `PORT` environment variable is required.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use qrread_api::{create_router, AppState};
use qrread_core::RqrrDecoder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

/// Parsed command-line arguments
struct Args {
    /// Server config file (TOML)
    config_path: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut result = Args { config_path: None };

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            arg if !arg.starts_with('-') => {
                // Positional argument = config file
                result.config_path = Some(PathBuf::from(arg));
            }
            _ => {
                tracing::warn!("Unknown argument: {}", arg);
            }
        }
    }

    result
}

fn print_help() {
    eprintln!(
        r#"qrreadd - QR reading server daemon

Usage: PORT=<port> qrreadd [OPTIONS] [config.toml]

Options:
  -h, --help    Print this help message

Environment:
  PORT          TCP port to listen on (required)
  RUST_LOG      Log filter (default: qrreadd=info,qrread_api=info)

Config file:
  [server]
  host = "0.0.0.0"              # bind address
  max_upload_bytes = 10485760   # largest accepted request body

Endpoints:
  POST /api/v1/read   multipart/form-data with an image in field "file"
  GET  /              returns "Base"
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "qrreadd=info,qrread_api=info,qrread_core=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = parse_args();
    let config = ServerConfig::load(args.config_path.as_deref())?;

    tracing::info!("Starting server");
    tracing::info!(
        max_upload_bytes = config.max_upload_bytes,
        "Upload limit configured"
    );

    let state = AppState::with_upload_limit(Arc::new(RqrrDecoder::new()), config.max_upload_bytes);
    let app = create_router(state);

    let addr = config.addr();
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
