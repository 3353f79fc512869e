use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Closed set of actions a user can take on a content item.
///
/// `like`/`unlike`/`save`/`unsave` carry scoring weight; `view`/`tap`/`share`
/// are logged but contribute nothing to affinity scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Tap,
    Save,
    Unsave,
    Like,
    Unlike,
    Share,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::View,
        Action::Tap,
        Action::Save,
        Action::Unsave,
        Action::Like,
        Action::Unlike,
        Action::Share,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Tap => "tap",
            Action::Save => "save",
            Action::Unsave => "unsave",
            Action::Like => "like",
            Action::Unlike => "unlike",
            Action::Share => "share",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(Action::View),
            "tap" => Ok(Action::Tap),
            "save" => Ok(Action::Save),
            "unsave" => Ok(Action::Unsave),
            "like" => Ok(Action::Like),
            "unlike" => Ok(Action::Unlike),
            "share" => Ok(Action::Share),
            other => {
                let allowed = Action::ALL.map(|a| a.as_str()).join(", ");
                Err(format!("Invalid action '{other}'. Allowed actions: [{allowed}]"))
            }
        }
    }
}

/// One row of the append-only interaction log. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InteractionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content_id: Uuid,
    pub action: String,
    pub duration: Option<i32>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
