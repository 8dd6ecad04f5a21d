use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod aggregate;
mod cache;
mod classify;
mod config;
mod db;
mod error;
mod format;
mod handlers;
mod models;
mod timeframe;

use cache::SummaryCache;

// ── Shared application state ───────────────────────────────────────────────

pub struct AppState {
    pub db: sqlx::SqlitePool,
    /// Per-bucket cache for the summary statistics so dashboard polling
    /// doesn't recompute the all-time peak on every request.
    pub summary_cache: SummaryCache,
}

// ── Entry point ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (ignore error if file is absent — env vars may already be set)
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "probewatch=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = config::AppConfig::from_env()?;
    tracing::info!("Starting Probewatch on {}:{}", config.host, config.port);

    // Open SQLite connection pool
    // CREATE the file if it doesn't exist yet
    let db = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(
            config
                .database_url
                .parse::<sqlx::sqlite::SqliteConnectOptions>()?
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal),
        )
        .await?;

    // Run embedded migrations (files in migrations/)
    sqlx::migrate!("./migrations").run(&db).await?;
    tracing::info!("Database migrations applied");

    let bind_addr = format!("{}:{}", config.host, config.port);

    let state = Arc::new(AppState {
        db,
        summary_cache: SummaryCache::new(),
    });

    // ── Router ─────────────────────────────────────────────────────────────
    let stats_router = Router::new()
        .route("/devices_timeseries", get(handlers::stats::devices_timeseries))
        .route("/count", get(handlers::stats::device_count))
        .route("/summary", get(handlers::stats::summary))
        .route("/realtime", get(handlers::stats::realtime));

    let app = Router::new()
        // Health check — returns 200 OK with no body
        .route("/health", get(|| async { axum::http::StatusCode::OK }))
        .nest("/stats", stats_router)
        .route("/devices", get(handlers::devices::list_devices))
        .route("/devices/:mac", get(handlers::devices::get_device))
        .route("/ingest", post(handlers::ingest::ingest))
        // Development only: truncate the sighting log
        .route("/clear", post(handlers::ingest::clear))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    // ── Serve ──────────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
