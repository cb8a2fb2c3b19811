// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace controller (workspace-controller)
//!
//! Watches Workspace resources and converges their compute, network,
//! storage and access objects toward the desired state.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::path::Path;

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use ws_daemon::{Config, DaemonError};

const LOG_FILE: &str = "workspace-controller.log";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("workspace-controller {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("workspace-controller {}", env!("CARGO_PKG_VERSION"));
                println!("Kubernetes controller for Workspace resources");
                println!();
                println!("USAGE:");
                println!("    workspace-controller");
                println!();
                println!("ENVIRONMENT:");
                println!("    WS_CONFIG                  Path to a TOML config file");
                println!("    WS_POLL_REQUEUE_MS         Short requeue interval");
                println!("    WS_LONG_REQUEUE_MS         Long requeue interval");
                println!("    WS_RECONCILE_TIMEOUT_MS    Deadline for one reconciliation pass");
                println!("    WS_WATCH_NAMESPACE         Watch one namespace instead of all");
                println!("    WS_LOG_DIR                 Write logs to this directory");
                println!("    RUST_LOG                   Log filter (default: info)");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: workspace-controller [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load().map_err(DaemonError::from)?;
    let _log_guard = setup_logging(config.log_dir.as_deref())?;

    let client = kube::Client::try_default()
        .await
        .map_err(DaemonError::from)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        timeout_ms = config.reconcile_timeout.as_millis() as u64,
        "connected to cluster"
    );

    ws_daemon::run(client, &config).await;
    Ok(())
}

/// Install the global subscriber.
///
/// Logs go to stdout unless a log directory is configured. The returned
/// guard must live until exit so buffered file output is flushed.
fn setup_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>, DaemonError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
        return Ok(None);
    };

    std::fs::create_dir_all(dir).map_err(|e| DaemonError::LogDir(dir.to_path_buf(), e))?;
    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(Some(guard))
}
