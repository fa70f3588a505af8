// src/normalize/keys.rs - Key representations derived from token sequences

use crate::normalize::suffix::strip_suffix;
use crate::normalize::tokens::clean_tokens;

/// Short function words across the Latin languages these names come from.
/// Excluded from acronym derivation so "Banco Bilbao Vizcaya Argentaria"
/// yields "bbva" and not a longer code polluted by connectives.
pub const STOPWORDS: [&str; 20] = [
    "and", "of", "the", "de", "la", "le", "di", "del", "della", "van", "von", "der", "den", "du",
    "da", "dos", "das", "do", "y", "et",
];

/// Every key representation of one raw name, computed in a single pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameKeys {
    /// Ordered tokens before suffix stripping (acronym derivation needs these).
    pub tokens: Vec<String>,
    /// Tokens after suffix stripping.
    pub stripped: Vec<String>,
    /// Space-joined stripped tokens; exact matching tolerant of suffix noise.
    pub normalized: String,
    /// Stripped tokens with no separator; tolerant of spacing and hyphenation.
    pub compact: String,
}

impl NameKeys {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Normalize a raw name and derive its full key set.
pub fn derive_keys(name: &str) -> NameKeys {
    let tokens = clean_tokens(name);
    let stripped = strip_suffix(&tokens);
    let normalized = stripped.join(" ");
    let compact = stripped.concat();
    NameKeys {
        tokens,
        stripped,
        normalized,
        compact,
    }
}

/// Initials of the unstripped tokens, skipping purely numeric tokens and
/// stopwords. Uses the pre-stripping sequence so a trailing "Holding" still
/// contributes its letter (CRH-style acronyms survive). Callers must treat
/// acronyms shorter than the configured minimum as too weak to use.
pub fn acronym(tokens: &[String]) -> String {
    tokens
        .iter()
        .filter(|t| {
            !t.is_empty()
                && !t.chars().all(|c| c.is_ascii_digit())
                && !STOPWORDS.contains(&t.as_str())
        })
        .filter_map(|t| t.chars().next())
        .collect()
}

/// Uppercase root of a ticker-like string: cut at the first of `. : /` or
/// whitespace (exchange suffixes like "BBVA.MC"), then at `-` (share classes
/// like "RDS-A"). Empty input yields an empty base.
pub fn symbol_base(symbol: &str) -> String {
    let s = symbol.trim();
    if s.is_empty() {
        return String::new();
    }

    let s = s
        .split(|c: char| c == '.' || c == ':' || c == '/' || c.is_whitespace())
        .next()
        .unwrap_or("");
    let s = s.split('-').next().unwrap_or("");

    s.trim().to_uppercase()
}
