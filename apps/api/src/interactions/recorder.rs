use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::affinity::engine::recompute_profile;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::interaction::{Action, InteractionRow};
use crate::models::user::{ProfileTag, UserRow};

pub struct NewInteraction {
    pub content_id: Uuid,
    pub action: Action,
    pub duration: Option<i32>,
    pub metadata: Option<serde_json::Value>,
}

pub struct RecordOutcome {
    pub interaction: InteractionRow,
    pub triggered_recompute: bool,
    /// The full persisted profile when a recompute ran; empty otherwise.
    pub updated_tags: Vec<ProfileTag>,
}

/// Cadence rule: a recompute is due exactly when the lifetime interaction
/// count is a positive multiple of the window size.
pub fn recompute_due(total_count: i64, window: u32) -> bool {
    total_count > 0 && total_count % window as i64 == 0
}

/// Appends one interaction for `user` and, when the cadence rule fires,
/// synchronously recomputes the tag-affinity profile.
///
/// The interaction row is persisted regardless of the cadence outcome.
/// Callers validate the action and the content item before funneling in.
pub async fn record_interaction(
    db: &PgPool,
    config: &Config,
    user: &UserRow,
    new: NewInteraction,
) -> Result<RecordOutcome, AppError> {
    let interaction = sqlx::query_as::<_, InteractionRow>(
        r#"
        INSERT INTO interactions (user_id, content_id, action, duration, metadata)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(new.content_id)
    .bind(new.action.as_str())
    .bind(new.duration)
    .bind(&new.metadata)
    .fetch_one(db)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM interactions WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(db)
        .await?;

    if !recompute_due(total, config.recompute_window) {
        return Ok(RecordOutcome {
            interaction,
            triggered_recompute: false,
            updated_tags: Vec::new(),
        });
    }

    info!(
        "Interaction {} for user {} hit the recompute cadence (window {})",
        total, user.id, config.recompute_window
    );
    let updated_tags = recompute_profile(db, config, user).await?;

    Ok(RecordOutcome {
        interaction,
        triggered_recompute: true,
        updated_tags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recompute_due_on_exact_multiples() {
        assert!(recompute_due(7, 7));
        assert!(recompute_due(14, 7));
        assert!(recompute_due(70, 7));
    }

    #[test]
    fn test_recompute_not_due_between_multiples() {
        for count in [1, 2, 3, 4, 5, 6, 8, 13] {
            assert!(!recompute_due(count, 7), "count {count} should not trigger");
        }
    }

    #[test]
    fn test_zero_interactions_never_trigger() {
        assert!(!recompute_due(0, 7));
    }

    #[test]
    fn test_window_is_injectable() {
        assert!(recompute_due(10, 10));
        assert!(!recompute_due(7, 10));
    }
}
