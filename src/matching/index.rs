// src/matching/index.rs - Immutable reference-name index

use log::{debug, warn};
use std::collections::{HashMap, HashSet};

use crate::normalize::derive_keys;

/// Lookup structure built once per run from the reference dataset and
/// read-only afterwards: the exact-key sets plus an inverted index from each
/// stripped token to the normalized keys containing it.
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    normalized_keys: HashSet<String>,
    compact_keys: HashSet<String>,
    token_index: HashMap<String, HashSet<String>>,
    skipped_blank: usize,
}

impl ReferenceIndex {
    /// Build the index in a single pass over the reference names. Records
    /// whose name normalizes to no tokens are skipped and counted; that is
    /// not fatal, they simply cannot participate in matching.
    pub fn build<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut index = Self::default();

        for name in names {
            let keys = derive_keys(name);
            if keys.is_empty() {
                debug!("Skipping reference record with blank name: {:?}", name);
                index.skipped_blank += 1;
                continue;
            }

            index.normalized_keys.insert(keys.normalized.clone());
            index.compact_keys.insert(keys.compact.clone());
            for token in &keys.stripped {
                index
                    .token_index
                    .entry(token.clone())
                    .or_default()
                    .insert(keys.normalized.clone());
            }
        }

        if index.skipped_blank > 0 {
            warn!(
                "Skipped {} reference records with blank names",
                index.skipped_blank
            );
        }
        index
    }

    pub fn contains_normalized(&self, key: &str) -> bool {
        self.normalized_keys.contains(key)
    }

    pub fn contains_compact(&self, key: &str) -> bool {
        self.compact_keys.contains(key)
    }

    /// Whether any reference name contains this stripped token.
    pub fn has_token(&self, token: &str) -> bool {
        self.token_index.contains_key(token)
    }

    /// Normalized keys of the reference names containing this token.
    pub fn keys_for_token(&self, token: &str) -> Option<&HashSet<String>> {
        self.token_index.get(token)
    }

    /// Number of distinct normalized reference keys.
    pub fn len(&self) -> usize {
        self.normalized_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normalized_keys.is_empty()
    }

    pub fn skipped_blank(&self) -> usize {
        self.skipped_blank
    }
}
