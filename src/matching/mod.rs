// src/matching/mod.rs

pub mod engine;
pub mod index;
pub mod refresh;

pub use engine::MatchEngine;
pub use index::ReferenceIndex;
pub use refresh::{refresh_unmatched, row_key, RefreshOutcome};
