//! FindAJob Admin - backend for the job centre catalog
//!
//! Serves the admin JSON API (CSV bulk upload of job centres, listing,
//! template download) and offers the same import from the command line.

mod cli;
mod config;
mod db;
mod defaults;
mod handlers;
mod services;
mod types;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::cli::{Cli, Command};
use crate::services::import::{import_local_file, ImportOptions};
use crate::types::{ErrorResponse, ImportResponse};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs directory - use LOGS_DIR env var or default to ./logs
    let logs_dir = std::env::var("LOGS_DIR").unwrap_or_else(|_| "./logs".to_string());
    std::fs::create_dir_all(&logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &logs_dir, "findajob-admin.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let json_stdout = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let stdout_layer = if json_stdout {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    // Initialize logging - both stdout and file
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,findajob_admin=debug".into()),
        ))
        .with(stdout_layer)
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    info!("Configuration loaded");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting FindAJob Admin...");
            let pool = db::create_pool(&config.database_url, config.max_connections).await?;
            info!("Connected to PostgreSQL");
            db::run_migrations(&pool).await?;

            if let Err(e) = handlers::serve(pool, &config).await {
                error!("Server error: {:#}", e);
                return Err(e);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Migrate => {
            let pool = db::create_pool(&config.database_url, config.max_connections).await?;
            db::run_migrations(&pool).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Import {
            path,
            skip_duplicates,
        } => {
            let options = ImportOptions {
                skip_duplicates,
                max_error_details: config.max_error_details,
            };
            let database_url = config.database_url.clone();
            let max_connections = config.max_connections;

            let outcome = import_local_file(&path, &options, move || async move {
                let pool = db::create_pool(&database_url, max_connections).await?;
                info!("Connected to PostgreSQL");
                db::run_migrations(&pool).await?;
                Ok::<_, anyhow::Error>(pool)
            })
            .await;

            match outcome {
                Ok(result) => {
                    println!("{}", serde_json::to_string_pretty(&ImportResponse::from(result))?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    error!("Import of {} failed: {}", path.display(), e);
                    println!("{}", serde_json::to_string_pretty(&ErrorResponse::new(e.to_string()))?);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}
