//! Per-action weights and score arithmetic. All pure.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::interaction::Action;

/// How per-action weights combine into one raw score for a tag entry.
/// `Sum` is the default; `Average` divides the sum by the action count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreMode {
    Sum,
    Average,
}

impl FromStr for ScoreMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" => Ok(ScoreMode::Sum),
            "average" => Ok(ScoreMode::Average),
            other => Err(format!(
                "Invalid SCORE_MODE '{other}'. Must be 'sum' or 'average'"
            )),
        }
    }
}

/// Fixed weight table. Passive actions carry no weight.
pub fn action_weight(action: Action) -> f64 {
    match action {
        Action::Like => 0.3,
        Action::Unlike => -0.3,
        Action::Save => 0.5,
        Action::Unsave => -0.5,
        Action::View | Action::Tap | Action::Share => 0.0,
    }
}

/// Raw score for one weighted-tag entry: the combined weight of every action
/// recorded against the owning content item within the window.
pub fn raw_score(actions: &[Action], mode: ScoreMode) -> f64 {
    let sum: f64 = actions.iter().copied().map(action_weight).sum();
    match mode {
        ScoreMode::Sum => sum,
        ScoreMode::Average if actions.is_empty() => 0.0,
        ScoreMode::Average => sum / actions.len() as f64,
    }
}

/// Snaps a merged score into the open (0, 1) domain: values below 0 become
/// 0.01, values above 1 become 0.99. In-range values pass through untouched.
pub fn clamp_score(score: f64) -> f64 {
    if score < 0.0 {
        0.01
    } else if score > 1.0 {
        0.99
    } else {
        score
    }
}

/// Persisted scores carry exactly 3 decimal places.
pub fn round3(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}
