use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A saved card or career, with a denormalized snapshot of the item as it
/// looked at save time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedItemRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_type: String,
    pub item_id: Uuid,
    pub item: serde_json::Value,
    pub saved_at: DateTime<Utc>,
}
