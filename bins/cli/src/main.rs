//! Conciliador command-line front end.
//!
//! Usage:
//!   conciliador reconcile --company <uuid> [--period 2024-03] [--authority liquidation]
//!   conciliador generate-book --company <uuid> --period 2024-03
//!   conciliador propose-journal --company <uuid> --rcv compras.json [--grouping per-entity]
//!   conciliador post-journal --company <uuid> --entry propuesta.json
//!
//! Results are printed to stdout as JSON; logs go to stderr.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use conciliador_shared::AppError;
use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Command failed");
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "conciliador=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Process exit code for a failed command.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<AppError>()
        .and_then(|app| u8::try_from(app.exit_code()).ok())
        .unwrap_or(1)
}
