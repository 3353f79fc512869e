use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CardRow {
    pub id: Uuid,
    pub card_type: String,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub priority: i32,
    pub color: Option<String>,
    /// Denormalized like counter, floored at 0.
    pub likes: i32,
    /// Generic tag list. Free-form JSON; only object-shaped entries
    /// participate in affinity scoring.
    pub tags: serde_json::Value,
    /// Type-specific nested payload. May carry its own `tags` array, which is
    /// merged with the generic list during tag extraction.
    pub display_data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
