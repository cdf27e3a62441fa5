//! Configuration management

use std::net::SocketAddr;

use anyhow::{self, Context, Result};

use crate::defaults::{DEFAULT_BIND_ADDR, DEFAULT_MAX_CONNECTIONS};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,

    /// Size of the PostgreSQL connection pool
    pub max_connections: u32,

    /// Upper bound on `error_details` messages kept per import (None = unbounded)
    pub max_error_details: Option<usize>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set")?;

        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:8080")?;

        let max_connections = match std::env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };
        if max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
        }

        let max_error_details =
            parse_error_details_cap(std::env::var("IMPORT_MAX_ERROR_DETAILS").ok().as_deref())?;

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            max_error_details,
        })
    }
}

/// Empty or missing means unbounded; zero is rejected since it would hide
/// every row error.
fn parse_error_details_cap(raw: Option<&str>) -> Result<Option<usize>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let cap = raw
        .parse::<usize>()
        .with_context(|| format!("IMPORT_MAX_ERROR_DETAILS must be a positive integer, got '{raw}'"))?;
    if cap == 0 {
        anyhow::bail!("IMPORT_MAX_ERROR_DETAILS must be at least 1 (unset it for no limit)");
    }
    Ok(Some(cap))
}
