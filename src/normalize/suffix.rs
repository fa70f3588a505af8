// src/normalize/suffix.rs - Trailing legal-entity suffix removal

/// Multi-token tails introduced by punctuation stripping, e.g. "S.p.A."
/// tokenizes to ["s", "p", "a"]. Tried in table order each iteration.
const SUFFIX_PATTERNS: [&[&str]; 4] = [&["s", "p", "a"], &["s", "a"], &["s", "e"], &["a", "s"]];

/// Single trailing legal/corporate suffix tokens, lowercase.
const SUFFIX_TOKENS: [&str; 25] = [
    "se", "sa", "plc", "nv", "ag", "spa", "oyj", "ab", "as", "asa", "gmbh", "kgaa", "kg", "sarl",
    "bv", "co", "company", "corp", "corporation", "inc", "ltd", "limited", "holding", "holdings",
    "group",
];

/// Strip trailing legal-entity tokens from a token sequence.
///
/// Repeatedly removes a matching multi-token tail pattern, otherwise a single
/// trailing suffix token, until neither rule fires. The loop is bounded by
/// the initial token count (each pass removes at least one token), so it
/// terminates on any input. If stripping would consume the whole sequence the
/// original tokens are returned instead, which keeps records that are
/// literally named by a legal suffix (e.g. "Holding") matchable.
pub fn strip_suffix(tokens: &[String]) -> Vec<String> {
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut t: Vec<String> = tokens.to_vec();
    for _ in 0..tokens.len() {
        let mut changed = false;

        for pat in SUFFIX_PATTERNS {
            if t.len() >= pat.len()
                && t[t.len() - pat.len()..]
                    .iter()
                    .map(String::as_str)
                    .eq(pat.iter().copied())
            {
                t.truncate(t.len() - pat.len());
                changed = true;
                break;
            }
        }

        if !changed {
            if let Some(last) = t.last() {
                if SUFFIX_TOKENS.contains(&last.as_str()) {
                    t.pop();
                    changed = true;
                }
            }
        }

        if !changed || t.is_empty() {
            break;
        }
    }

    if t.is_empty() {
        tokens.to_vec()
    } else {
        t
    }
}
