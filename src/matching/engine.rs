// src/matching/engine.rs - Ordered heuristic chain deciding candidate matches

use std::collections::HashSet;

use crate::config::MatchConfig;
use crate::matching::index::ReferenceIndex;
use crate::models::MatchRule;
use crate::normalize::{acronym, derive_keys, symbol_base, NameKeys, STOPWORDS};

/// Tokens too generic to serve as evidence on their own: a lone "capital" or
/// "holding" overlapping one reference name proves nothing.
pub const GENERIC_TOKENS: [&str; 38] = [
    "bank",
    "banco",
    "banque",
    "insurance",
    "assurance",
    "reinsurance",
    "capital",
    "financial",
    "finance",
    "invest",
    "investments",
    "investment",
    "partners",
    "partner",
    "services",
    "service",
    "solutions",
    "technology",
    "technologies",
    "systems",
    "system",
    "international",
    "industries",
    "industry",
    "energy",
    "resources",
    "communications",
    "telecom",
    "telecommunications",
    "pharma",
    "pharmaceutical",
    "holding",
    "holdings",
    "group",
    "company",
    "companies",
    "corp",
    "corporation",
];

/// Evaluates candidates against an immutable [`ReferenceIndex`] through an
/// ordered, short-circuiting rule chain. The chain is total: every rule
/// either fires or falls through, for any input including empty names.
///
/// Rule order puts the cheap, high-precision checks first; the final
/// key-token rule deliberately rejects ambiguous overlaps rather than
/// guessing, trading false negatives for false positives.
pub struct MatchEngine<'a> {
    index: &'a ReferenceIndex,
    config: MatchConfig,
}

impl<'a> MatchEngine<'a> {
    pub fn new(index: &'a ReferenceIndex, config: MatchConfig) -> Self {
        Self { index, config }
    }

    pub fn config(&self) -> MatchConfig {
        self.config
    }

    /// Decide whether a candidate already exists in the reference set.
    /// Returns the first rule that fires, or `None` for unmatched.
    pub fn decide(&self, name: &str, symbol: &str) -> Option<MatchRule> {
        let keys = derive_keys(name);

        // A blank name never matches; it surfaces in the unmatched output
        // instead of being silently resolved through its ticker.
        if keys.is_empty() {
            return None;
        }

        if self.exact(&keys) {
            return Some(MatchRule::Exact);
        }
        if self.symbol(symbol) {
            return Some(MatchRule::Symbol);
        }
        if self.single_token(&keys) {
            return Some(MatchRule::SingleToken);
        }
        if self.acronym(&keys) {
            return Some(MatchRule::Acronym);
        }
        if self.key_token(&keys) {
            return Some(MatchRule::KeyToken);
        }
        None
    }

    /// Rule 1: normalized or compact key found verbatim in the reference sets.
    fn exact(&self, keys: &NameKeys) -> bool {
        self.index.contains_normalized(&keys.normalized)
            || self.index.contains_compact(&keys.compact)
    }

    /// Rule 2: the ticker base, normalized as if it were a name, resolves
    /// against the reference keys; or its single stripped token is contained
    /// in some reference name.
    fn symbol(&self, symbol: &str) -> bool {
        let base = symbol_base(symbol);
        if base.is_empty() {
            return false;
        }

        let sym = derive_keys(&base);
        if sym.is_empty() {
            return false;
        }
        if self.index.contains_normalized(&sym.normalized)
            || self.index.contains_compact(&sym.compact)
        {
            return true;
        }
        sym.stripped.len() == 1 && self.index.has_token(&sym.stripped[0])
    }

    /// Rule 3: a one-token candidate contained in a longer reference name,
    /// e.g. "Generali" inside "Assicurazioni Generali". Generic corporate
    /// tokens and stopwords are excluded; a candidate named just "Capital"
    /// overlapping several reference names is no evidence at all.
    fn single_token(&self, keys: &NameKeys) -> bool {
        if keys.stripped.len() != 1 {
            return false;
        }
        let token = keys.stripped[0].as_str();
        if GENERIC_TOKENS.contains(&token) || STOPWORDS.contains(&token) {
            return false;
        }
        self.index.has_token(token)
    }

    /// Rule 4: the candidate's acronym equals a reference key outright
    /// ("Banco Bilbao Vizcaya Argentaria" vs a reference named "BBVA") or is
    /// itself a registered token of some reference name.
    fn acronym(&self, keys: &NameKeys) -> bool {
        let acr = acronym(&keys.tokens);
        if acr.chars().count() < self.config.min_acronym_len {
            return false;
        }
        self.index.contains_normalized(&acr) || self.index.has_token(&acr)
    }

    /// Rule 5: key-token disambiguation. Union the reference keys sharing any
    /// "specific" candidate token; match only when exactly one key remains.
    /// The union is abandoned once it exceeds the ambiguity cap.
    fn key_token(&self, keys: &NameKeys) -> bool {
        let mut candidates: HashSet<&str> = HashSet::new();

        for token in keys.stripped.iter().filter(|t| self.is_key_token(t.as_str())) {
            if let Some(matched_keys) = self.index.keys_for_token(token) {
                candidates.extend(matched_keys.iter().map(String::as_str));
            }
            if candidates.len() > self.config.ambiguity_cap {
                return false;
            }
        }

        candidates.len() == 1
    }

    fn is_key_token(&self, token: &str) -> bool {
        token.chars().count() >= self.config.min_key_token_len
            && !GENERIC_TOKENS.contains(&token)
            && !STOPWORDS.contains(&token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(index: &ReferenceIndex) -> MatchEngine<'_> {
        MatchEngine::new(index, MatchConfig::default())
    }

    #[test]
    fn test_exact_tolerates_diacritics_case_punctuation_and_suffixes() {
        let index = ReferenceIndex::build(["BBVA", "Telefónica SA"]);
        let engine = engine(&index);

        for name in ["BBVA", "bbva", "B.B.V.A", "Bbva SA", "BBVA Group"] {
            assert_eq!(engine.decide(name, ""), Some(MatchRule::Exact), "{}", name);
        }
        assert_eq!(engine.decide("Telefonica", ""), Some(MatchRule::Exact));
    }

    #[test]
    fn test_symbol_base_resolves_against_reference() {
        let index = ReferenceIndex::build(["BBVA"]);
        let engine = engine(&index);

        assert_eq!(
            engine.decide("Banco Bilbao Vizcaya", "BBVA.MC"),
            Some(MatchRule::Symbol)
        );
        // Share-class suffix is cut before resolution.
        assert_eq!(engine.decide("Some Bank", "BBVA-A"), Some(MatchRule::Symbol));
        assert_eq!(engine.decide("Some Bank", "XYZ.MC"), None);
    }

    #[test]
    fn test_symbol_single_token_containment() {
        let index = ReferenceIndex::build(["Assicurazioni Generali"]);
        let engine = engine(&index);
        assert_eq!(
            engine.decide("Something Else", "GENERALI.MI"),
            Some(MatchRule::Symbol)
        );
    }

    #[test]
    fn test_single_token_containment() {
        let index = ReferenceIndex::build(["Assicurazioni Generali"]);
        let engine = engine(&index);
        assert_eq!(engine.decide("Generali", ""), Some(MatchRule::SingleToken));
        assert_eq!(engine.decide("Generali S.p.A.", ""), Some(MatchRule::SingleToken));
    }

    #[test]
    fn test_single_generic_token_does_not_match() {
        let index = ReferenceIndex::build(["Capital One", "Acme Capital Group"]);
        let engine = engine(&index);
        assert_eq!(engine.decide("Capital", ""), None);
        assert_eq!(engine.decide("Capital Holdings", ""), None);
    }

    #[test]
    fn test_acronym_matches_reference_key() {
        let index = ReferenceIndex::build(["BBVA"]);
        let engine = engine(&index);
        assert_eq!(
            engine.decide("Banco Bilbao Vizcaya Argentaria", ""),
            Some(MatchRule::Acronym)
        );
    }

    #[test]
    fn test_short_acronym_is_discarded() {
        let index = ReferenceIndex::build(["BA"]);
        let engine = engine(&index);
        // "Bank of America" -> acronym "ba", below the minimum length.
        assert_eq!(engine.decide("Bank of America", ""), None);
    }

    #[test]
    fn test_key_token_unique_resolution() {
        let index = ReferenceIndex::build(["Kering", "Criteo Advertising", "Vivendi Media"]);
        let engine = engine(&index);
        assert_eq!(
            engine.decide("Criteo Technologies Group", ""),
            Some(MatchRule::KeyToken)
        );
    }

    #[test]
    fn test_key_token_ambiguity_bails_out() {
        // Two references share the specific token; resolution is ambiguous.
        let index = ReferenceIndex::build(["Santander Consumer", "Santander Asset Management"]);
        let engine = engine(&index);
        assert_eq!(engine.decide("Santander Partners International", ""), None);
    }

    #[test]
    fn test_blank_name_never_matches() {
        let index = ReferenceIndex::build(["BBVA"]);
        let engine = engine(&index);
        assert_eq!(engine.decide("", ""), None);
        assert_eq!(engine.decide("   ", "BBVA.MC"), None);
        assert_eq!(engine.decide("...", ""), None);
    }

    #[test]
    fn test_config_accessor_reports_active_settings() {
        let index = ReferenceIndex::build(["BBVA"]);
        let config = MatchConfig {
            min_acronym_len: 4,
            min_key_token_len: 6,
            ambiguity_cap: 3,
        };
        let engine = MatchEngine::new(&index, config);
        assert_eq!(engine.config(), config);
    }

    #[test]
    fn test_unmatched_candidate() {
        let index = ReferenceIndex::build(["Assicurazioni Generali", "BBVA"]);
        let engine = engine(&index);
        assert_eq!(engine.decide("Zalando SE", "ZAL.DE"), None);
    }
}
