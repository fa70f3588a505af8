// src/models/stats.rs - Match outcomes and per-rule run statistics

use log::info;
use std::collections::HashMap;

/// Which rule of the ordered heuristic chain decided a match. Order here
/// mirrors evaluation order: cheap, high-precision rules first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchRule {
    /// Normalized or compact key found verbatim in the reference sets.
    Exact,
    /// Ticker symbol base resolved against the reference keys or token index.
    Symbol,
    /// Single stripped token contained in some reference name.
    SingleToken,
    /// Acronym of the unstripped tokens equals a reference key or token.
    Acronym,
    /// Specific-token union resolved to exactly one reference key.
    KeyToken,
}

impl MatchRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchRule::Exact => "exact",
            MatchRule::Symbol => "symbol",
            MatchRule::SingleToken => "single_token",
            MatchRule::Acronym => "acronym",
            MatchRule::KeyToken => "key_token",
        }
    }

    pub const ALL: [MatchRule; 5] = [
        MatchRule::Exact,
        MatchRule::Symbol,
        MatchRule::SingleToken,
        MatchRule::Acronym,
        MatchRule::KeyToken,
    ];
}

/// Counters for one full candidate pass.
#[derive(Debug, Default, Clone)]
pub struct MatchStats {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub by_rule: HashMap<MatchRule, usize>,
}

impl MatchStats {
    pub fn record(&mut self, outcome: Option<MatchRule>) {
        self.total += 1;
        match outcome {
            Some(rule) => {
                self.matched += 1;
                *self.by_rule.entry(rule).or_insert(0) += 1;
            }
            None => self.unmatched += 1,
        }
    }

    pub fn rule_count(&self, rule: MatchRule) -> usize {
        self.by_rule.get(&rule).copied().unwrap_or(0)
    }

    pub fn log_summary(&self) {
        info!("=== Match Summary ===");
        info!("Candidate rows: {}", self.total);
        info!("Matched: {}", self.matched);
        info!("Unmatched: {}", self.unmatched);
        for rule in MatchRule::ALL {
            let count = self.rule_count(rule);
            if count > 0 {
                info!("  {}: {}", rule.as_str(), count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_are_conserved() {
        let mut stats = MatchStats::default();
        stats.record(Some(MatchRule::Exact));
        stats.record(Some(MatchRule::Exact));
        stats.record(Some(MatchRule::Acronym));
        stats.record(None);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.matched + stats.unmatched, stats.total);
        assert_eq!(stats.rule_count(MatchRule::Exact), 2);
        assert_eq!(stats.rule_count(MatchRule::Acronym), 1);
        assert_eq!(stats.rule_count(MatchRule::Symbol), 0);
        let per_rule: usize = MatchRule::ALL.iter().map(|r| stats.rule_count(*r)).sum();
        assert_eq!(per_rule, stats.matched);
    }
}
