// src/matching/refresh.rs - Refresh the unmatched set, carrying prior annotations

use log::{debug, info};
use std::collections::HashMap;

use crate::matching::engine::MatchEngine;
use crate::models::{CandidateTable, MatchStats, RawTable};
use crate::normalize::{derive_keys, symbol_base};

/// Join key tying a candidate row to its prior-run counterpart:
/// (normalized name key, symbol base). Recomputed on both sides, so it is
/// stable across cosmetic edits to either file.
pub fn row_key(table: &CandidateTable, row: &[String]) -> (String, String) {
    (
        derive_keys(table.name(row)).normalized,
        symbol_base(table.symbol(row)),
    )
}

/// Result of a refresh pass: the merged output table plus carry statistics.
#[derive(Debug)]
pub struct RefreshOutcome {
    pub output: RawTable,
    /// Rows that inherited annotation values from the prior output.
    pub carried: usize,
    /// Newly unmatched rows with no prior annotations.
    pub fresh: usize,
}

/// Run the full match pass over `candidates` and keep the unmatched subset,
/// merging in any annotation columns from a prior output.
///
/// Annotation columns are the prior output's columns that are absent from the
/// candidate schema. Matching join keys inherit the prior values, new
/// unmatched rows get empty values, and rows that now match are dropped along
/// with their annotations. Output column order is the candidate columns
/// followed by the annotation columns, so re-running with unchanged inputs is
/// a fixed point.
pub fn refresh_unmatched(
    candidates: &CandidateTable,
    prior: Option<&CandidateTable>,
    engine: &MatchEngine,
    stats: &mut MatchStats,
) -> RefreshOutcome {
    let extra_columns: Vec<String> = prior
        .map(|p| {
            p.headers()
                .iter()
                .filter(|c| !c.is_empty() && !candidates.headers().contains(c))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    // Annotation values per join key, in extra_columns order. First
    // occurrence wins; the all-empty key carries nothing useful and is skipped.
    let mut annotations: HashMap<(String, String), Vec<String>> = HashMap::new();
    if let Some(prior) = prior {
        let extra_indices: Vec<Option<usize>> = extra_columns
            .iter()
            .map(|c| prior.table.column_index(c))
            .collect();
        for row in prior.rows() {
            let key = row_key(prior, row);
            if key.0.is_empty() && key.1.is_empty() {
                continue;
            }
            annotations.entry(key).or_insert_with(|| {
                extra_indices
                    .iter()
                    .map(|idx| {
                        idx.and_then(|i| row.get(i))
                            .cloned()
                            .unwrap_or_default()
                    })
                    .collect()
            });
        }
        debug!(
            "Prior output: {} rows, {} annotation columns, {} keyed annotations",
            prior.len(),
            extra_columns.len(),
            annotations.len()
        );
    }

    let mut headers: Vec<String> = candidates.headers().to_vec();
    headers.extend(extra_columns.iter().cloned());

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut carried = 0usize;
    let mut fresh = 0usize;

    for row in candidates.rows() {
        let outcome = engine.decide(candidates.name(row), candidates.symbol(row));
        stats.record(outcome);
        if outcome.is_some() {
            continue;
        }

        let mut out_row = row.clone();
        match annotations.get(&row_key(candidates, row)) {
            Some(values) => {
                out_row.extend(values.iter().cloned());
                carried += 1;
            }
            None => {
                out_row.extend(std::iter::repeat(String::new()).take(extra_columns.len()));
                fresh += 1;
            }
        }
        rows.push(out_row);
    }

    info!(
        "Refresh: {} unmatched rows ({} carried annotations, {} new)",
        rows.len(),
        carried,
        fresh
    );

    RefreshOutcome {
        output: RawTable { headers, rows },
        carried,
        fresh,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;
    use crate::matching::index::ReferenceIndex;

    fn candidates() -> CandidateTable {
        let table = RawTable {
            headers: vec!["Name".into(), "Symbol".into(), "Cap".into()],
            rows: vec![
                vec!["BBVA".into(), "BBVA.MC".into(), "10".into()],
                vec!["Zalando SE".into(), "ZAL.DE".into(), "20".into()],
                vec!["Kering".into(), "KER.PA".into(), "30".into()],
            ],
        };
        CandidateTable::from_raw(table, "Name", "Symbol").unwrap()
    }

    fn prior() -> CandidateTable {
        let table = RawTable {
            headers: vec!["Name".into(), "Symbol".into(), "Cap".into(), "Status".into()],
            rows: vec![
                vec!["Zalando SE".into(), "ZAL.DE".into(), "19".into(), "reviewed".into()],
                vec!["Kering".into(), "KER.PA".into(), "30".into(), "pending".into()],
                // Previously unmatched, now resolved by the reference set.
                vec!["BBVA".into(), "BBVA.MC".into(), "10".into(), "stale".into()],
            ],
        };
        CandidateTable::from_raw(table, "Name", "Symbol").unwrap()
    }

    #[test]
    fn test_annotations_carried_by_recomputed_key() {
        let index = ReferenceIndex::build(["BBVA"]);
        let engine = MatchEngine::new(&index, MatchConfig::default());
        let mut stats = MatchStats::default();

        let candidates = candidates();
        let prior = prior();
        let outcome = refresh_unmatched(&candidates, Some(&prior), &engine, &mut stats);

        // BBVA matches (exact rule) and is dropped, annotations included.
        assert_eq!(stats.total, 3);
        assert_eq!(stats.matched, 1);
        assert_eq!(outcome.output.rows.len(), 2);
        assert_eq!(outcome.carried, 2);
        assert_eq!(outcome.fresh, 0);

        assert_eq!(
            outcome.output.headers,
            vec!["Name", "Symbol", "Cap", "Status"]
        );
        // Passthrough cells come from the current candidates, annotations
        // from the prior output.
        assert_eq!(
            outcome.output.rows[0],
            vec!["Zalando SE", "ZAL.DE", "20", "reviewed"]
        );
        assert_eq!(
            outcome.output.rows[1],
            vec!["Kering", "KER.PA", "30", "pending"]
        );
    }

    #[test]
    fn test_no_prior_output_yields_plain_unmatched() {
        let index = ReferenceIndex::build(["BBVA"]);
        let engine = MatchEngine::new(&index, MatchConfig::default());
        let mut stats = MatchStats::default();

        let candidates = candidates();
        let outcome = refresh_unmatched(&candidates, None, &engine, &mut stats);
        assert_eq!(outcome.output.headers, vec!["Name", "Symbol", "Cap"]);
        assert_eq!(outcome.output.rows.len(), 2);
        assert_eq!(outcome.fresh, 2);
    }

    #[test]
    fn test_new_unmatched_row_gets_empty_annotations() {
        let index = ReferenceIndex::build(["Nobody"]);
        let engine = MatchEngine::new(&index, MatchConfig::default());
        let mut stats = MatchStats::default();

        let candidates = candidates();
        let prior_table = RawTable {
            headers: vec!["Name".into(), "Symbol".into(), "Cap".into(), "Status".into()],
            rows: vec![vec![
                "Kering".into(),
                "KER.PA".into(),
                "30".into(),
                "pending".into(),
            ]],
        };
        let prior = CandidateTable::from_raw(prior_table, "Name", "Symbol").unwrap();

        let outcome = refresh_unmatched(&candidates, Some(&prior), &engine, &mut stats);
        assert_eq!(outcome.output.rows.len(), 3);
        let zalando = outcome
            .output
            .rows
            .iter()
            .find(|r| r[0] == "Zalando SE")
            .unwrap();
        assert_eq!(zalando[3], "");
        let kering = outcome
            .output
            .rows
            .iter()
            .find(|r| r[0] == "Kering")
            .unwrap();
        assert_eq!(kering[3], "pending");
    }

    #[test]
    fn test_refresh_twice_is_a_fixed_point() {
        let index = ReferenceIndex::build(["BBVA"]);
        let engine = MatchEngine::new(&index, MatchConfig::default());

        let candidates = candidates();
        let mut stats = MatchStats::default();
        let first = refresh_unmatched(&candidates, Some(&prior()), &engine, &mut stats);

        let first_output =
            CandidateTable::from_raw(first.output.clone(), "Name", "Symbol").unwrap();
        let mut stats2 = MatchStats::default();
        let second = refresh_unmatched(&candidates, Some(&first_output), &engine, &mut stats2);

        assert_eq!(first.output, second.output);
    }
}
