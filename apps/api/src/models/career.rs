use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CareerRow {
    pub id: Uuid,
    pub name: String,
    pub faculty: String,
    pub description: String,
    pub duration: Option<String>,
    pub employability: Option<String>,
    pub created_at: DateTime<Utc>,
}
