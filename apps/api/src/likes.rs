//! Like/unlike toggle on cards.
//!
//! Keeps two denormalized views in step: the user's embedded liked-items
//! list and the card's like counter (floored at 0). A successful toggle then
//! funnels through the interaction recorder, so it can trigger a profile
//! recompute on the cadence boundary. State violations (double like, unlike
//! of a not-liked card) are rejected before any write.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::types::Json as SqlJson;
use uuid::Uuid;

use crate::auth;
use crate::errors::AppError;
use crate::interactions::recorder::{record_interaction, NewInteraction};
use crate::models::interaction::Action;
use crate::models::user::{LikedItem, ProfileTag};
use crate::state::AppState;
use crate::store;

#[derive(Deserialize)]
pub struct LikeRequest {
    pub action: String,
}

#[derive(Serialize)]
pub struct LikeResponse {
    pub message: String,
    pub triggered_recompute: bool,
    pub updated_tags: Vec<ProfileTag>,
}

/// True when the user's liked-items list already holds this card.
pub fn already_liked(likes: &[LikedItem], card_id: Uuid) -> bool {
    likes.iter().any(|item| item.card_id == card_id)
}

/// POST /api/v1/cards/:id/likes
pub async fn handle_toggle_like(
    State(state): State<AppState>,
    Path(card_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<LikeRequest>,
) -> Result<Json<LikeResponse>, AppError> {
    let user = auth::require_user(&state, &headers).await?;

    let liking = match req.action.as_str() {
        "like" => true,
        "unlike" => false,
        other => {
            return Err(AppError::Validation(format!(
                "Invalid action: {other}. Must be 'like' or 'unlike'"
            )))
        }
    };

    let card = store::find_card(&state.db, card_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Card not found".to_string()))?;

    let mut likes = user.likes.0.clone();
    let has_liked = already_liked(&likes, card.id);

    if liking {
        if has_liked {
            return Err(AppError::InvalidState(
                "Card already liked by user".to_string(),
            ));
        }
        likes.push(LikedItem {
            card_id: card.id,
            title: card.title.clone(),
            content: card.content.clone(),
            card_type: card.card_type.clone(),
        });
    } else {
        if !has_liked {
            return Err(AppError::InvalidState("Card not liked by user".to_string()));
        }
        likes.retain(|item| item.card_id != card.id);
    }

    let new_count = if liking {
        card.likes + 1
    } else {
        (card.likes - 1).max(0)
    };

    sqlx::query("UPDATE cards SET likes = $1 WHERE id = $2")
        .bind(new_count)
        .bind(card.id)
        .execute(&state.db)
        .await?;

    sqlx::query("UPDATE users SET likes = $1 WHERE id = $2")
        .bind(SqlJson(&likes))
        .bind(user.id)
        .execute(&state.db)
        .await?;

    let action = if liking { Action::Like } else { Action::Unlike };
    let outcome = record_interaction(
        &state.db,
        &state.config,
        &user,
        NewInteraction {
            content_id: card.id,
            action,
            duration: None,
            metadata: None,
        },
    )
    .await?;

    Ok(Json(LikeResponse {
        message: "Like action updated".to_string(),
        triggered_recompute: outcome.triggered_recompute,
        updated_tags: outcome.updated_tags,
    }))
}
