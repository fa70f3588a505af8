// src/config.rs - Heuristic thresholds for the match rule chain

use log::{debug, info};
use std::env;

// Defaults carried over from the production heuristics. Their
// precision/recall tradeoff is unvalidated; the rule_threshold_eval binary
// exists to check them against labeled data.
const DEFAULT_MIN_ACRONYM_LEN: usize = 3;
const DEFAULT_MIN_KEY_TOKEN_LEN: usize = 5;
const DEFAULT_AMBIGUITY_CAP: usize = 5;

/// Tunable knobs of the match engine, overridable per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    /// Acronyms shorter than this are discarded as too weak to disambiguate.
    pub min_acronym_len: usize,
    /// Minimum length for a stripped token to count as "specific" evidence
    /// in key-token disambiguation.
    pub min_key_token_len: usize,
    /// Key-token disambiguation bails out (no match) once the candidate key
    /// union grows past this many distinct reference keys.
    pub ambiguity_cap: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_acronym_len: DEFAULT_MIN_ACRONYM_LEN,
            min_key_token_len: DEFAULT_MIN_KEY_TOKEN_LEN,
            ambiguity_cap: DEFAULT_AMBIGUITY_CAP,
        }
    }
}

impl MatchConfig {
    /// Create configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        fn env_usize(key: &str, default: usize) -> usize {
            env::var(key)
                .ok()
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(default)
        }

        let config = Self {
            min_acronym_len: env_usize("MATCH_MIN_ACRONYM_LEN", DEFAULT_MIN_ACRONYM_LEN),
            min_key_token_len: env_usize("MATCH_MIN_KEY_TOKEN_LEN", DEFAULT_MIN_KEY_TOKEN_LEN),
            ambiguity_cap: env_usize("MATCH_AMBIGUITY_CAP", DEFAULT_AMBIGUITY_CAP),
        };
        debug!("Match config from env: {:?}", config);
        config
    }

    /// Log the active configuration.
    pub fn log_config(&self) {
        info!(
            "Match config: min_acronym_len={}, min_key_token_len={}, ambiguity_cap={}",
            self.min_acronym_len, self.min_key_token_len, self.ambiguity_cap
        );
    }
}
