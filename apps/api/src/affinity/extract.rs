//! Tag extraction from content items.
//!
//! A card may carry tags in two places: the generic `tags` list and a
//! type-specific `display_data.tags` list. Both are inspected and merged.
//! Only object-shaped entries count as tags; anything else (strings, nulls)
//! is skipped.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::models::card::CardRow;
use crate::models::interaction::Action;

/// A tag paired with every action recorded against its owning content item
/// within the recompute window. Ephemeral; exists only during one pass.
///
/// The full tag payload is kept as-is so dedup can compare entries by
/// complete serialization, not just by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedTag {
    #[serde(flatten)]
    pub payload: serde_json::Map<String, Value>,
    pub actions: Vec<Action>,
}

impl WeightedTag {
    /// The tag's stable identifier, if the payload carries a usable one.
    pub fn tag_id(&self) -> Option<String> {
        self.payload.get("id").and_then(tag_id_string)
    }

    pub fn name(&self) -> String {
        self.payload
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }
}

/// Normalizes a tag id value to a string key. Ids may arrive as strings or
/// numbers depending on which taxonomy produced them.
pub fn tag_id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Collects every tag attached to each card, from both tag-bearing fields,
/// pairing it with all actions recorded against that card in the window.
pub fn extract_weighted_tags(
    cards: &[CardRow],
    actions_by_card: &HashMap<Uuid, Vec<Action>>,
) -> Vec<WeightedTag> {
    let mut out = Vec::new();
    for card in cards {
        let actions = actions_by_card.get(&card.id).cloned().unwrap_or_default();
        let display_tags = card.display_data.as_ref().and_then(|d| d.get("tags"));
        for source in [display_tags, Some(&card.tags)] {
            let Some(Value::Array(tags)) = source else {
                continue;
            };
            for tag in tags {
                if let Value::Object(payload) = tag {
                    out.push(WeightedTag {
                        payload: payload.clone(),
                        actions: actions.clone(),
                    });
                }
            }
        }
    }
    out
}

/// Collapses entries whose full tag payload AND action list serialize
/// identically. First occurrence wins; entries differing in any field
/// (including action order) are kept apart.
pub fn dedup_weighted_tags(tags: Vec<WeightedTag>) -> Vec<WeightedTag> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .filter(|tag| {
            let key = serde_json::to_string(tag).unwrap_or_default();
            seen.insert(key)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn card(id: Uuid, tags: Value, display_data: Option<Value>) -> CardRow {
        CardRow {
            id,
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

    fn weighted(payload: Value, actions: Vec<Action>) -> WeightedTag {
        let Value::Object(payload) = payload else {
            panic!("payload must be an object");
        };
        WeightedTag { payload, actions }
    }

    #[test]
    fn test_merges_both_tag_shapes() {
        let id = Uuid::new_v4();
        let cards = vec![card(
            id,
            json!([{"id": "t2", "name": "Design"}]),
            Some(json!({"tags": [{"id": "t1", "name": "Engineering"}]})),
        )];
        let actions = HashMap::from([(id, vec![Action::Like])]);

        let tags = extract_weighted_tags(&cards, &actions);
        assert_eq!(tags.len(), 2);
        // display_data tags come first, then the generic list
        assert_eq!(tags[0].tag_id().as_deref(), Some("t1"));
        assert_eq!(tags[1].tag_id().as_deref(), Some("t2"));
        assert_eq!(tags[0].actions, vec![Action::Like]);
    }

    #[test]
    fn test_non_object_tags_are_skipped() {
        let id = Uuid::new_v4();
        let cards = vec![card(
            id,
            json!(["plain-string", null, {"id": "t1", "name": "Engineering"}]),
            None,
        )];
        let tags = extract_weighted_tags(&cards, &HashMap::new());
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].tag_id().as_deref(), Some("t1"));
        assert!(tags[0].actions.is_empty());
    }

    #[test]
    fn test_all_card_actions_attach_to_every_tag() {
        let id = Uuid::new_v4();
        let cards = vec![card(
            id,
            json!([{"id": "t1", "name": "A"}, {"id": "t2", "name": "B"}]),
            None,
        )];
        let actions = HashMap::from([(id, vec![Action::Save, Action::Like])]);

        let tags = extract_weighted_tags(&cards, &actions);
        assert_eq!(tags.len(), 2);
        for tag in &tags {
            assert_eq!(tag.actions, vec![Action::Save, Action::Like]);
        }
    }

    #[test]
    fn test_dedup_collapses_identical_entries() {
        let a = weighted(json!({"id": "t1", "name": "A"}), vec![Action::Like]);
        let tags = dedup_weighted_tags(vec![a.clone(), a.clone()]);
        assert_eq!(tags, vec![a]);
    }

    #[test]
    fn test_dedup_keeps_entries_differing_by_actions() {
        let a = weighted(json!({"id": "t1", "name": "A"}), vec![Action::Like]);
        let b = weighted(json!({"id": "t1", "name": "A"}), vec![Action::Save]);
        assert_eq!(dedup_weighted_tags(vec![a.clone(), b.clone()]).len(), 2);
    }

    #[test]
    fn test_dedup_keeps_entries_differing_by_payload() {
        let a = weighted(json!({"id": "t1", "name": "A"}), vec![Action::Like]);
        let b = weighted(
            json!({"id": "t1", "name": "A", "weight": 2}),
            vec![Action::Like],
        );
        assert_eq!(dedup_weighted_tags(vec![a, b]).len(), 2);
    }

    #[test]
    fn test_numeric_tag_ids_normalize() {
        assert_eq!(tag_id_string(&json!(42)).as_deref(), Some("42"));
        assert_eq!(tag_id_string(&json!("t1")).as_deref(), Some("t1"));
        assert_eq!(tag_id_string(&json!({"nested": true})), None);
    }
}
