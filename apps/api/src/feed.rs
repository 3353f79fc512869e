//! Personalized card feed, ranked by overlap between a card's tags and the
//! user's affinity profile. A card matching zero profile tags never appears.

use std::collections::HashSet;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::affinity::extract::tag_id_string;
use crate::auth;
use crate::errors::AppError;
use crate::models::card::CardRow;
use crate::models::user::ProfileTag;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 8;
const MAX_LIMIT: usize = 20;

#[derive(Debug, Serialize)]
pub struct RankedCard {
    #[serde(flatten)]
    pub card: CardRow,
    pub matching_tag_count: usize,
}

/// Number of distinct profile tag ids this card matches, counted across both
/// tag-bearing fields.
pub fn matching_tag_count(card: &CardRow, profile_ids: &HashSet<String>) -> usize {
    let mut matched: HashSet<String> = HashSet::new();
    let display_tags = card.display_data.as_ref().and_then(|d| d.get("tags"));
    for source in [display_tags, Some(&card.tags)] {
        let Some(Value::Array(tags)) = source else {
            continue;
        };
        for tag in tags {
            let Some(id) = tag.get("id").and_then(tag_id_string) else {
                continue;
            };
            if profile_ids.contains(&id) {
                matched.insert(id);
            }
        }
    }
    matched.len()
}

/// Ranks candidate cards by matching tag count descending, card id ascending
/// as tie-break for stable paging. Zero-match cards are dropped.
pub fn rank_cards(cards: Vec<CardRow>, profile: &[ProfileTag]) -> Vec<RankedCard> {
    let profile_ids: HashSet<String> = profile.iter().map(|t| t.tag.clone()).collect();
    let mut ranked: Vec<RankedCard> = cards
        .into_iter()
        .filter_map(|card| {
            let count = matching_tag_count(&card, &profile_ids);
            (count > 0).then_some(RankedCard {
                card,
                matching_tag_count: count,
            })
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.matching_tag_count
            .cmp(&a.matching_tag_count)
            .then(a.card.id.cmp(&b.card.id))
    });
    ranked
}

#[derive(Deserialize)]
pub struct FeedQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Serialize)]
pub struct FeedResponse {
    pub cards: Vec<RankedCard>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// GET /api/v1/feed
pub async fn handle_get_feed(
    State(state): State<AppState>,
    Query(params): Query<FeedQuery>,
    headers: HeaderMap,
) -> Result<Json<FeedResponse>, AppError> {
    let user = auth::require_user(&state, &headers).await?;

    if user.user_tags.0.is_empty() {
        return Err(AppError::Validation(
            "User tags not found. Please complete your profile first.".to_string(),
        ));
    }

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let cards = sqlx::query_as::<_, CardRow>("SELECT * FROM cards")
        .fetch_all(&state.db)
        .await?;

    let ranked = rank_cards(cards, &user.user_tags.0);
    let total = ranked.len();
    let cards: Vec<RankedCard> = ranked.into_iter().skip(offset).take(limit).collect();

    Ok(Json(FeedResponse {
        cards,
        total,
        limit,
        offset,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn card(tags: Value, display_data: Option<Value>) -> CardRow {
        CardRow {
            id: Uuid::new_v4(),
            card_type: "info".to_string(),
            title: "t".to_string(),
            content: "c".to_string(),
            image_url: None,
            priority: 0,
            color: None,
            likes: 0,
            tags,
            display_data,
            created_at: Utc::now(),
        }
    }

    fn profile(ids: &[&str]) -> Vec<ProfileTag> {
        ids.iter()
            .map(|id| ProfileTag {
                tag: id.to_string(),
                name: id.to_string(),
                score: 0.5,
            })
            .collect()
    }

    #[test]
    fn test_counts_distinct_matches_across_both_fields() {
        let card = card(
            json!([{"id": "t1", "name": "A"}, {"id": "t2", "name": "B"}]),
            Some(json!({"tags": [{"id": "t1", "name": "A"}, {"id": "t3", "name": "C"}]})),
        );
        let ids: HashSet<String> = ["t1", "t2"].iter().map(|s| s.to_string()).collect();
        // t1 appears in both fields but counts once
        assert_eq!(matching_tag_count(&card, &ids), 2);
    }

    #[test]
    fn test_zero_match_cards_are_dropped() {
        let cards = vec![
            card(json!([{"id": "t9", "name": "X"}]), None),
            card(json!([{"id": "t1", "name": "A"}]), None),
        ];
        let ranked = rank_cards(cards, &profile(&["t1"]));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].matching_tag_count, 1);
    }

    #[test]
    fn test_most_relevant_card_ranks_first() {
        let one = card(json!([{"id": "t1", "name": "A"}]), None);
        let two = card(
            json!([{"id": "t1", "name": "A"}, {"id": "t2", "name": "B"}]),
            None,
        );
        let ranked = rank_cards(vec![one, two], &profile(&["t1", "t2"]));
        assert_eq!(ranked[0].matching_tag_count, 2);
        assert_eq!(ranked[1].matching_tag_count, 1);
    }

    #[test]
    fn test_ties_break_by_card_id_for_stable_paging() {
        let a = card(json!([{"id": "t1", "name": "A"}]), None);
        let b = card(json!([{"id": "t1", "name": "A"}]), None);
        let expected_first = a.id.min(b.id);
        let ranked = rank_cards(vec![a, b], &profile(&["t1"]));
        assert_eq!(ranked[0].card.id, expected_first);
    }
}
