//! The recompute engine: trailing interaction window → batched card lookup →
//! tag extraction → dedup → weighting → profile merge → full-list write-back.
//!
//! The per-user profile is a single JSONB list replaced wholesale on every
//! recompute. Concurrent recomputes for the same user race last-write-wins;
//! the loss is bounded to minor score drift, so no optimistic lock is taken.

use std::collections::HashMap;

use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::affinity::extract::{dedup_weighted_tags, extract_weighted_tags, WeightedTag};
use crate::affinity::weights::{clamp_score, raw_score, round3, ScoreMode};
use crate::config::Config;
use crate::errors::AppError;
use crate::models::interaction::{Action, InteractionRow};
use crate::models::user::{ProfileTag, UserRow};
use crate::store;

/// One raw score per distinct tag id, accumulated across the window.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTag {
    pub tag: String,
    pub name: String,
    pub score: f64,
}

/// Folds deduplicated weighted-tag entries into one raw score per tag id.
/// The same tag id seen on multiple content items accumulates; entries with
/// no usable id are dropped. First-seen order is preserved.
pub fn fold_raw_scores(entries: &[WeightedTag], mode: ScoreMode) -> Vec<ScoredTag> {
    let mut folded: Vec<ScoredTag> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for entry in entries {
        let Some(id) = entry.tag_id() else {
            continue;
        };
        let score = raw_score(&entry.actions, mode);
        match index.get(&id).copied() {
            Some(i) => folded[i].score += score,
            None => {
                index.insert(id.clone(), folded.len());
                folded.push(ScoredTag {
                    tag: id,
                    name: entry.name(),
                    score,
                });
            }
        }
    }
    folded
}

/// Merges freshly computed raw scores into the stored profile.
///
/// Re-encountered tags are replaced with `stored + raw / 2`; new tags enter
/// with their raw score; tags not in the window keep their previous entry.
/// Both paths clamp into (0, 1) and every persisted score is rounded to
/// 3 decimal places. The result holds at most one entry per tag id.
pub fn merge_profile(stored: &[ProfileTag], computed: &[ScoredTag]) -> Vec<ProfileTag> {
    let mut untouched: Vec<ProfileTag> = stored.to_vec();
    let mut updated: Vec<ProfileTag> = Vec::new();

    for tag in computed {
        let score = match untouched.iter().position(|t| t.tag == tag.tag) {
            Some(i) => {
                let prior = untouched.remove(i);
                prior.score + tag.score / 2.0
            }
            None => tag.score,
        };
        updated.push(ProfileTag {
            tag: tag.tag.clone(),
            name: tag.name.clone(),
            score: clamp_score(score),
        });
    }

    untouched
        .into_iter()
        .chain(updated)
        .map(|t| ProfileTag {
            score: round3(t.score),
            ..t
        })
        .collect()
}

/// Runs one full recompute pass for `user` and persists the result.
/// A window that yields zero scorable tags is a no-op, not an error.
pub async fn recompute_profile(
    db: &PgPool,
    config: &Config,
    user: &UserRow,
) -> Result<Vec<ProfileTag>, AppError> {
    let window = sqlx::query_as::<_, InteractionRow>(
        "SELECT * FROM interactions WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(user.id)
    .bind(config.recompute_window as i64)
    .fetch_all(db)
    .await?;

    // A content item may appear several times in the window; all its actions
    // accumulate onto each of its tags.
    let mut actions_by_card: HashMap<Uuid, Vec<Action>> = HashMap::new();
    let mut card_ids: Vec<Uuid> = Vec::new();
    for interaction in &window {
        let Ok(action) = interaction.action.parse::<Action>() else {
            continue;
        };
        if !actions_by_card.contains_key(&interaction.content_id) {
            card_ids.push(interaction.content_id);
        }
        actions_by_card
            .entry(interaction.content_id)
            .or_default()
            .push(action);
    }

    let cards = store::find_cards_by_ids(db, &card_ids).await?;

    let entries = dedup_weighted_tags(extract_weighted_tags(&cards, &actions_by_card));
    let computed = fold_raw_scores(&entries, config.score_mode);
    if computed.is_empty() {
        debug!(
            "Recompute window for user {} yielded no tags; profile unchanged",
            user.id
        );
        return Ok(user.user_tags.0.clone());
    }

    let profile = merge_profile(&user.user_tags.0, &computed);

    sqlx::query("UPDATE users SET user_tags = $1 WHERE id = $2")
        .bind(Json(&profile))
        .bind(user.id)
        .execute(db)
        .await?;

    debug!(
        "Recomputed {} profile entries for user {} from a window of {} interactions",
        profile.len(),
        user.id,
        window.len()
    );
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EPS: f64 = 1e-9;

    fn weighted(payload: serde_json::Value, actions: Vec<Action>) -> WeightedTag {
        let serde_json::Value::Object(payload) = payload else {
            panic!("payload must be an object");
        };
        WeightedTag { payload, actions }
    }

    fn profile_tag(tag: &str, name: &str, score: f64) -> ProfileTag {
        ProfileTag {
            tag: tag.to_string(),
            name: name.to_string(),
            score,
        }
    }

    #[test]
    fn test_fold_accumulates_same_tag_across_items() {
        let entries = vec![
            weighted(json!({"id": "t1", "name": "Engineering"}), vec![Action::Like]),
            weighted(
                json!({"id": "t1", "name": "Engineering", "weight": 2}),
                vec![Action::Save],
            ),
        ];
        let folded = fold_raw_scores(&entries, ScoreMode::Sum);
        assert_eq!(folded.len(), 1);
        assert_eq!(folded[0].tag, "t1");
        assert!((folded[0].score - 0.8).abs() < EPS);
    }

    #[test]
    fn test_fold_drops_entries_without_id() {
        let entries = vec![weighted(json!({"name": "orphan"}), vec![Action::Like])];
        assert!(fold_raw_scores(&entries, ScoreMode::Sum).is_empty());
    }

    #[test]
    fn test_merge_halves_raw_score_into_existing_entry() {
        // stored 0.40, one unlike in the window: 0.40 + (-0.3 / 2) = 0.250
        let stored = vec![profile_tag("t1", "Engineering", 0.40)];
        let computed = vec![ScoredTag {
            tag: "t1".to_string(),
            name: "Engineering".to_string(),
            score: -0.3,
        }];
        let merged = merge_profile(&stored, &computed);
        assert_eq!(merged.len(), 1);
        assert!((merged[0].score - 0.25).abs() < EPS);
    }

    #[test]
    fn test_merge_inserts_new_tag_with_raw_score() {
        // first save on a fresh tag enters at its raw 0.5
        let computed = vec![ScoredTag {
            tag: "t1".to_string(),
            name: "Engineering".to_string(),
            score: 0.5,
        }];
        let merged = merge_profile(&[], &computed);
        assert_eq!(merged.len(), 1);
        assert!((merged[0].score - 0.5).abs() < EPS);
    }

    #[test]
    fn test_merge_clamps_low_scores_to_floor() {
        let stored = vec![profile_tag("t1", "Engineering", 0.10)];
        let computed = vec![ScoredTag {
            tag: "t1".to_string(),
            name: "Engineering".to_string(),
            score: -0.5,
        }];
        // 0.10 - 0.25 = -0.15 → 0.01
        let merged = merge_profile(&stored, &computed);
        assert!((merged[0].score - 0.01).abs() < EPS);
    }

    #[test]
    fn test_merge_clamps_high_scores_to_ceiling() {
        let stored = vec![profile_tag("t1", "Engineering", 0.95)];
        let computed = vec![ScoredTag {
            tag: "t1".to_string(),
            name: "Engineering".to_string(),
            score: 0.5,
        }];
        // 0.95 + 0.25 = 1.20 → 0.99
        let merged = merge_profile(&stored, &computed);
        assert!((merged[0].score - 0.99).abs() < EPS);
    }

    #[test]
    fn test_merge_negative_insert_clamps_too() {
        let computed = vec![ScoredTag {
            tag: "t1".to_string(),
            name: "Engineering".to_string(),
            score: -0.5,
        }];
        let merged = merge_profile(&[], &computed);
        assert!((merged[0].score - 0.01).abs() < EPS);
    }

    #[test]
    fn test_merge_preserves_unseen_entries_first() {
        let stored = vec![
            profile_tag("t1", "Engineering", 0.40),
            profile_tag("t2", "Design", 0.30),
        ];
        let computed = vec![ScoredTag {
            tag: "t2".to_string(),
            name: "Design".to_string(),
            score: 0.3,
        }];
        let merged = merge_profile(&stored, &computed);
        assert_eq!(merged.len(), 2);
        // t1 untouched and first, t2 updated and moved to the back
        assert_eq!(merged[0], profile_tag("t1", "Engineering", 0.40));
        assert_eq!(merged[1].tag, "t2");
        assert!((merged[1].score - 0.45).abs() < EPS);
    }

    #[test]
    fn test_merge_yields_one_entry_per_tag_id() {
        let stored = vec![profile_tag("t1", "Engineering", 0.40)];
        let computed = vec![ScoredTag {
            tag: "t1".to_string(),
            name: "Engineering".to_string(),
            score: 0.3,
        }];
        let merged = merge_profile(&stored, &computed);
        let ids: Vec<&str> = merged.iter().map(|t| t.tag.as_str()).collect();
        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(ids, deduped);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_merged_scores_are_rounded_to_three_decimals() {
        let stored = vec![profile_tag("t1", "Engineering", 0.333_333)];
        let computed = vec![ScoredTag {
            tag: "t1".to_string(),
            name: "Engineering".to_string(),
            score: 0.3,
        }];
        let merged = merge_profile(&stored, &computed);
        assert!((merged[0].score - 0.483).abs() < EPS);
    }
}
