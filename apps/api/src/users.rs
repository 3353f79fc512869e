//! User registration and profile reads. Registration is keyed on the
//! external identity the gateway already verified; the affinity profile
//! starts empty and is only ever written by the recompute engine.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::errors::AppError;
use crate::models::user::{ProfileTag, UserRow};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserRow,
}

/// POST /api/v1/users
pub async fn handle_register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let external_id = auth::external_identity(&headers)?;

    let email = match req.email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => email.to_string(),
        _ => {
            return Err(AppError::Validation(
                "Missing required fields: [email]".to_string(),
            ))
        }
    };

    if state.identity.resolve(external_id).await?.is_some() {
        return Err(AppError::InvalidState(
            "User already registered".to_string(),
        ));
    }

    let user = sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (external_id, email) VALUES ($1, $2) RETURNING *",
    )
    .bind(external_id)
    .bind(&email)
    .fetch_one(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created".to_string(),
            user,
        }),
    ))
}

/// GET /api/v1/users/me
pub async fn handle_get_me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserRow>, AppError> {
    let user = auth::require_user(&state, &headers).await?;
    Ok(Json(user))
}

#[derive(Serialize)]
pub struct ProfileTagsResponse {
    pub user_tags: Vec<ProfileTag>,
}

/// GET /api/v1/profile/tags
pub async fn handle_get_profile_tags(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ProfileTagsResponse>, AppError> {
    let user = auth::require_user(&state, &headers).await?;
    Ok(Json(ProfileTagsResponse {
        user_tags: user.user_tags.0,
    }))
}
