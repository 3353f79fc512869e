//! Minimal content surface: card creation and card/career reads. Just enough
//! for the interaction, like, save, and feed flows to operate end to end.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth;
use crate::errors::AppError;
use crate::models::card::CardRow;
use crate::models::career::CareerRow;
use crate::state::AppState;
use crate::store;

#[derive(Deserialize)]
pub struct NewCardRequest {
    pub card_type: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub priority: Option<i32>,
    pub color: Option<String>,
    pub tags: Option<Value>,
    pub display_data: Option<Value>,
}

/// Names of required fields the request left out, in declaration order.
pub fn missing_card_fields(req: &NewCardRequest) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if req.card_type.as_deref().map_or(true, |v| v.trim().is_empty()) {
        missing.push("card_type");
    }
    if req.title.as_deref().map_or(true, |v| v.trim().is_empty()) {
        missing.push("title");
    }
    if req.content.as_deref().map_or(true, |v| v.trim().is_empty()) {
        missing.push("content");
    }
    if req.priority.is_none() {
        missing.push("priority");
    }
    missing
}

#[derive(Serialize)]
pub struct NewCardResponse {
    pub message: String,
    pub card: CardRow,
}

/// POST /api/v1/cards
pub async fn handle_new_card(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewCardRequest>,
) -> Result<(StatusCode, Json<NewCardResponse>), AppError> {
    auth::require_user(&state, &headers).await?;

    let missing = missing_card_fields(&req);
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Missing required fields: [{}]",
            missing.join(", ")
        )));
    }

    let tags = req.tags.unwrap_or_else(|| json!([]));
    if !tags.is_array() {
        return Err(AppError::Validation("Field 'tags' must be an array".to_string()));
    }

    let card = sqlx::query_as::<_, CardRow>(
        r#"
        INSERT INTO cards (card_type, title, content, image_url, priority, color, tags, display_data)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(req.card_type)
    .bind(req.title)
    .bind(req.content)
    .bind(req.image_url)
    .bind(req.priority)
    .bind(req.color)
    .bind(&tags)
    .bind(&req.display_data)
    .fetch_one(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(NewCardResponse {
            message: "Card created".to_string(),
            card,
        }),
    ))
}

/// GET /api/v1/cards/:id
pub async fn handle_get_card(
    State(state): State<AppState>,
    Path(card_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<CardRow>, AppError> {
    auth::require_user(&state, &headers).await?;
    let card = store::find_card(&state.db, card_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Card not found".to_string()))?;
    Ok(Json(card))
}

/// GET /api/v1/careers/:id
pub async fn handle_get_career(
    State(state): State<AppState>,
    Path(career_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<CareerRow>, AppError> {
    auth::require_user(&state, &headers).await?;
    let career = store::find_career(&state.db, career_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Career not found".to_string()))?;
    Ok(Json(career))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fields_present_yields_no_missing() {
        let req = NewCardRequest {
            card_type: Some("info".to_string()),
            title: Some("t".to_string()),
            content: Some("c".to_string()),
            image_url: None,
            priority: Some(1),
            color: None,
            tags: None,
            display_data: None,
        };
        assert!(missing_card_fields(&req).is_empty());
    }

    #[test]
    fn test_blank_and_absent_fields_are_reported_in_order() {
        let req = NewCardRequest {
            card_type: Some("  ".to_string()),
            title: None,
            content: Some("c".to_string()),
            image_url: None,
            priority: None,
            color: None,
            tags: None,
            display_data: None,
        };
        assert_eq!(missing_card_fields(&req), vec!["card_type", "title", "priority"]);
    }
}
