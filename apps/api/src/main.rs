mod affinity;
mod auth;
mod config;
mod content;
mod db;
mod errors;
mod feed;
mod interactions;
mod likes;
mod models;
mod routes;
mod saved;
mod state;
mod store;
mod users;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::{DbIdentityResolver, IdentityResolver};
use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("orienta_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Orienta API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Affinity recompute window: {} interactions, score mode: {:?}",
        config.recompute_window, config.score_mode
    );

    // Initialize PostgreSQL (pool + migrations)
    let db = create_pool(&config.database_url).await?;

    // Identity resolution backed by the users table
    let identity: Arc<dyn IdentityResolver> = Arc::new(DbIdentityResolver::new(db.clone()));

    let state = AppState {
        db,
        config: config.clone(),
        identity,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
