mod analysis;
mod backend;
mod config;
mod errors;
mod export;
mod models;
mod report;
mod routes;
mod state;
mod store;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::backend::BackendClient;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::KeyValueStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting recruiter API v{}", env!("CARGO_PKG_VERSION"));

    // Development key/value shim (bearer token, cached analyses)
    let store = Arc::new(
        KeyValueStore::open(&config.store_path)
            .with_context(|| format!("opening store at {}", config.store_path.display()))?,
    );
    info!("Store opened at {}", config.store_path.display());

    // Backend client
    let source = BackendClient::new(&config.backend_url, config.backend_timeout, store.clone())
        .context("building backend HTTP client")?;
    info!("Backend client initialized ({})", config.backend_url);

    let report = config.report_config();
    info!(
        "Report config: organization={:?} locale={:?}",
        report.organization, report.locale
    );

    let state = AppState {
        source: Arc::new(source),
        store,
        report: Arc::new(report),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
