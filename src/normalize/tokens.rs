// src/normalize/tokens.rs - Raw-name canonicalization into token sequences

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// Apostrophe variants are deleted outright so "L'Oreal" becomes "loreal"
// rather than "l oreal".
const APOSTROPHES: [char; 5] = ['\'', '\u{2019}', '\u{2018}', '\u{0060}', '\u{00b4}'];

static NON_ALNUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9a-z]+").unwrap());

/// Canonicalize a raw organization name into ordered lowercase alphanumeric
/// tokens: NFKD-decompose and drop combining marks, lowercase, expand `&`,
/// delete apostrophes, then collapse every run of other non-alphanumerics
/// into a single separator.
///
/// Total over all inputs; blank or punctuation-only names yield an empty
/// token sequence, never an error.
pub fn clean_tokens(name: &str) -> Vec<String> {
    let decomposed: String = name
        .trim()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    let mut s = decomposed.to_lowercase();
    s = s.replace('&', " and ");
    s.retain(|c| !APOSTROPHES.contains(&c));

    NON_ALNUM_RE
        .replace_all(&s, " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
