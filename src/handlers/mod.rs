//! HTTP handlers

pub mod job_centre;
pub mod ping;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::defaults::MAX_REQUEST_BODY_BYTES;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Cap on `error_details` per import (None = unbounded)
    pub max_error_details: Option<usize>,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self {
            pool,
            max_error_details: config.max_error_details,
        }
    }
}

/// Build the HTTP router
pub fn router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/admin/api/job-centres", get(job_centre::list_job_centres))
        .route(
            "/admin/api/job-centres/bulk-upload",
            post(job_centre::bulk_upload),
        )
        .route(
            "/admin/api/job-centres/template",
            get(job_centre::download_template),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES));

    Router::new()
        .route("/health", get(ping::health))
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve HTTP until Ctrl+C / SIGTERM
pub async fn serve(pool: PgPool, config: &Config) -> Result<()> {
    let app = router(AppState::new(pool, config));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
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
    info!("Shutdown signal received");
}
