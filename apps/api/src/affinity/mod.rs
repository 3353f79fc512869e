//! Tag-affinity scoring — the personalization core.
//!
//! Interactions on tagged content are periodically folded into a per-user
//! profile of `(tag, score)` entries with scores in (0, 1). The pipeline is
//! split into pure stages (extraction, dedup, weighting, merge) so each is
//! testable without a database; `engine::recompute_profile` wires them to
//! storage.

pub mod engine;
pub mod extract;
pub mod weights;
