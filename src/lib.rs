//! Deterministic company-name entity resolution.
//!
//! Given a candidate table of organizations and a reference database of
//! organization names, decide for each candidate whether it already exists in
//! the reference set via an ordered chain of explainable heuristics (exact
//! normalized keys, ticker bases, token containment, acronyms, key-token
//! disambiguation), and emit the unmatched subset. A refresh pass re-runs the
//! match and carries forward manually added annotation columns from a prior
//! output by recomputed join key.

pub mod config;
pub mod io;
pub mod matching;
pub mod models;
pub mod normalize;

pub use config::MatchConfig;
pub use matching::{refresh_unmatched, MatchEngine, ReferenceIndex, RefreshOutcome};
pub use models::{CandidateTable, MatchRule, MatchStats, RawTable};
