//! Interaction recording — the write path feeding the affinity engine.

pub mod handlers;
pub mod recorder;
