use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One entry of the per-user tag-affinity profile, embedded in the user's
/// `user_tags` JSONB list. `score` lives in (0, 1) and carries exactly three
/// decimal places once persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileTag {
    pub tag: String,
    pub name: String,
    pub score: f64,
}

/// Snapshot of a liked card, embedded in the user's `likes` JSONB list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikedItem {
    pub card_id: Uuid,
    pub title: String,
    pub content: String,
    pub card_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub external_id: String,
    pub email: String,
    pub role: String,
    pub user_tags: Json<Vec<ProfileTag>>,
    pub likes: Json<Vec<LikedItem>>,
    pub created_at: DateTime<Utc>,
}
