use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::IdentityResolver;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Pluggable identity lookup. Default: `DbIdentityResolver`.
    pub identity: Arc<dyn IdentityResolver>,
}
