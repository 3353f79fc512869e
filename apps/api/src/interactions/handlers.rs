use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth;
use crate::errors::AppError;
use crate::interactions::recorder::{record_interaction, NewInteraction};
use crate::models::interaction::{Action, InteractionRow};
use crate::models::user::ProfileTag;
use crate::state::AppState;
use crate::store;

#[derive(Deserialize)]
pub struct NewInteractionRequest {
    pub card_id: Uuid,
    pub action: String,
    pub duration: Option<i32>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Serialize)]
pub struct NewInteractionResponse {
    pub message: String,
    pub interaction: InteractionRow,
    pub triggered_recompute: bool,
    pub updated_tags: Vec<ProfileTag>,
}

/// POST /api/v1/interactions
pub async fn handle_new_interaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewInteractionRequest>,
) -> Result<(StatusCode, Json<NewInteractionResponse>), AppError> {
    let user = auth::require_user(&state, &headers).await?;

    let action: Action = req.action.parse().map_err(AppError::Validation)?;

    store::find_card(&state.db, req.card_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Card not found".to_string()))?;

    let outcome = record_interaction(
        &state.db,
        &state.config,
        &user,
        NewInteraction {
            content_id: req.card_id,
            action,
            duration: req.duration,
            metadata: req.metadata,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(NewInteractionResponse {
            message: "Interaction created".to_string(),
            interaction: outcome.interaction,
            triggered_recompute: outcome.triggered_recompute,
            updated_tags: outcome.updated_tags,
        }),
    ))
}
