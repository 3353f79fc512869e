//! Saved items — cards or careers a user bookmarks, stored with a snapshot
//! of the item as it looked at save time. Save and unsave both funnel an
//! interaction through the recorder, so either can land on the recompute
//! cadence boundary.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::auth;
use crate::errors::AppError;
use crate::interactions::recorder::{record_interaction, NewInteraction};
use crate::models::interaction::{Action, InteractionRow};
use crate::models::saved_item::SavedItemRow;
use crate::models::user::ProfileTag;
use crate::state::AppState;
use crate::store;

#[derive(Deserialize)]
pub struct SaveItemRequest {
    pub item_type: String,
    pub item_id: Uuid,
}

#[derive(Serialize)]
pub struct SaveItemResponse {
    pub message: String,
    pub saved_item: SavedItemRow,
    pub triggered_recompute: bool,
    pub updated_tags: Vec<ProfileTag>,
}

/// POST /api/v1/saved
pub async fn handle_save_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SaveItemRequest>,
) -> Result<(StatusCode, Json<SaveItemResponse>), AppError> {
    let user = auth::require_user(&state, &headers).await?;

    if req.item_type != "card" && req.item_type != "career" {
        return Err(AppError::Validation(format!(
            "Invalid type: {}. Must be 'card' or 'career'",
            req.item_type
        )));
    }

    let existing: Option<SavedItemRow> = sqlx::query_as(
        "SELECT * FROM saved_items WHERE user_id = $1 AND item_id = $2",
    )
    .bind(user.id)
    .bind(req.item_id)
    .fetch_optional(&state.db)
    .await?;
    if existing.is_some() {
        return Err(AppError::InvalidState("Item already saved".to_string()));
    }

    let snapshot = if req.item_type == "card" {
        let card = store::find_card(&state.db, req.item_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Card not found".to_string()))?;
        json!({
            "id": card.id,
            "type": card.card_type,
            "title": card.title,
            "content": card.content,
            "tags": card.tags,
            "priority": card.priority,
            "color": card.color,
            "display_data": card.display_data,
        })
    } else {
        let career = store::find_career(&state.db, req.item_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Career not found".to_string()))?;
        json!({
            "id": career.id,
            "name": career.name,
            "faculty": career.faculty,
            "description": career.description,
            "duration": career.duration,
            "employability": career.employability,
        })
    };

    let saved_item = sqlx::query_as::<_, SavedItemRow>(
        r#"
        INSERT INTO saved_items (user_id, item_type, item_id, item)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(&req.item_type)
    .bind(req.item_id)
    .bind(&snapshot)
    .fetch_one(&state.db)
    .await?;

    let outcome = record_interaction(
        &state.db,
        &state.config,
        &user,
        NewInteraction {
            content_id: req.item_id,
            action: Action::Save,
            duration: None,
            metadata: None,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SaveItemResponse {
            message: "Item saved successfully".to_string(),
            saved_item,
            triggered_recompute: outcome.triggered_recompute,
            updated_tags: outcome.updated_tags,
        }),
    ))
}

#[derive(Serialize)]
pub struct UnsaveItemResponse {
    pub message: String,
    pub interaction: InteractionRow,
    pub triggered_recompute: bool,
    pub updated_tags: Vec<ProfileTag>,
}

/// DELETE /api/v1/saved/:id
pub async fn handle_unsave_item(
    State(state): State<AppState>,
    Path(saved_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<UnsaveItemResponse>, AppError> {
    let user = auth::require_user(&state, &headers).await?;

    let item: SavedItemRow = sqlx::query_as("SELECT * FROM saved_items WHERE id = $1")
        .bind(saved_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Saved item not found".to_string()))?;

    if item.user_id != user.id {
        return Err(AppError::Forbidden(
            "You are not authorized to unsave this item".to_string(),
        ));
    }

    sqlx::query("DELETE FROM saved_items WHERE id = $1")
        .bind(item.id)
        .execute(&state.db)
        .await?;

    let outcome = record_interaction(
        &state.db,
        &state.config,
        &user,
        NewInteraction {
            content_id: item.item_id,
            action: Action::Unsave,
            duration: None,
            metadata: None,
        },
    )
    .await?;

    Ok(Json(UnsaveItemResponse {
        message: "Item unsaved successfully".to_string(),
        interaction: outcome.interaction,
        triggered_recompute: outcome.triggered_recompute,
        updated_tags: outcome.updated_tags,
    }))
}

#[derive(Serialize)]
pub struct SavedListResponse {
    pub saved_items: Vec<SavedItemRow>,
}

/// GET /api/v1/saved
pub async fn handle_get_saved(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SavedListResponse>, AppError> {
    let user = auth::require_user(&state, &headers).await?;

    let saved_items = sqlx::query_as::<_, SavedItemRow>(
        "SELECT * FROM saved_items WHERE user_id = $1 ORDER BY saved_at DESC",
    )
    .bind(user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(SavedListResponse { saved_items }))
}
