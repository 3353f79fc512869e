//! Identity resolution — maps an authenticated external identity to a user row.
//!
//! An upstream gateway authorizer has already verified the caller and set the
//! `x-user-id` header; this module only translates that opaque external id
//! into an internal user record.

use async_trait::async_trait;
use axum::http::HeaderMap;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

/// Header carrying the caller's external identity, set by the gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity lookup seam. Carried in `AppState` as `Arc<dyn IdentityResolver>`
/// so tests and alternative auth backends can swap the lookup without
/// touching handlers.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, external_id: &str) -> Result<Option<UserRow>, AppError>;
}

/// Default resolver: looks the external id up in the `users` table.
pub struct DbIdentityResolver {
    pool: PgPool,
}

impl DbIdentityResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityResolver for DbIdentityResolver {
    async fn resolve(&self, external_id: &str) -> Result<Option<UserRow>, AppError> {
        let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE external_id = $1")
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

/// Extracts the external identity header, or fails with 401.
pub fn external_identity(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)
}

/// Resolves the calling user, failing with 401 when the identity header is
/// missing and 404 when no user record exists for it.
pub async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<UserRow, AppError> {
    let external_id = external_identity(headers)?;
    state
        .identity
        .resolve(external_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_missing_header_is_unauthorized() {
        let headers = HeaderMap::new();
        assert!(matches!(
            external_identity(&headers),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_header_value_passes_through() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("clerk_abc123"));
        assert_eq!(external_identity(&headers).unwrap(), "clerk_abc123");
    }
}
