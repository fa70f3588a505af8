// src/models/mod.rs

pub mod records;
pub mod stats;

pub use records::{CandidateTable, RawTable};
pub use stats::{MatchRule, MatchStats};
