// src/bin/rule_threshold_eval.rs
//
// Evaluates the match rule chain against a labeled ground-truth file and
// sweeps the MatchConfig knobs. The production heuristics carried their
// thresholds (ambiguity cap 5, key-token length 5, acronym length 3) without
// any false-positive/false-negative measurement; this tool closes that gap.
//
// The labeled file is a CSV with the candidate name/symbol columns plus an
// "Expected" column holding `match` or `miss`.

use anyhow::{bail, Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::collections::HashMap;
use std::path::PathBuf;

use matching_lib::io::{load_reference_names, read_table};
use matching_lib::{CandidateTable, MatchConfig, MatchEngine, MatchRule, ReferenceIndex};

const SWEEP_MIN_KEY_TOKEN_LENS: [usize; 3] = [4, 5, 6];
const SWEEP_AMBIGUITY_CAPS: [usize; 3] = [3, 5, 8];
const SWEEP_MIN_ACRONYM_LENS: [usize; 2] = [3, 4];

#[derive(Parser)]
#[command(
    name = "rule_threshold_eval",
    about = "Evaluate match-rule thresholds against labeled ground truth"
)]
struct Cli {
    /// Labeled CSV file (candidate columns plus an expected-outcome column)
    #[arg(long)]
    labeled: PathBuf,

    /// Reference database JSON file
    #[arg(long)]
    reference: PathBuf,

    /// Field holding the company name in the reference JSON records
    #[arg(long, default_value = "c")]
    reference_field: String,

    /// Column holding the company name
    #[arg(long, default_value = "Name")]
    name_column: String,

    /// Column holding the ticker symbol
    #[arg(long, default_value = "Symbol")]
    symbol_column: String,

    /// Column holding the expected outcome (`match` or `miss`)
    #[arg(long, default_value = "Expected")]
    expected_column: String,

    /// Evaluate a random sample of this many labeled rows instead of all
    #[arg(long)]
    sample: Option<usize>,
}

/// One labeled example.
struct LabeledRow {
    name: String,
    symbol: String,
    expected_match: bool,
}

#[derive(Debug, Default)]
struct EvalCounts {
    true_positives: usize,
    false_positives: usize,
    true_negatives: usize,
    false_negatives: usize,
    tp_by_rule: HashMap<MatchRule, usize>,
    fp_by_rule: HashMap<MatchRule, usize>,
}

impl EvalCounts {
    fn precision(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_positives,
        )
    }

    fn recall(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_negatives,
        )
    }

    fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    info!("Loading reference database {}", cli.reference.display());
    let reference_names = load_reference_names(&cli.reference, &cli.reference_field)?;
    let index = ReferenceIndex::build(reference_names.iter().map(String::as_str));
    info!("Reference index: {} distinct keys", index.len());

    let mut labeled = load_labeled_rows(&cli)?;
    if let Some(sample) = cli.sample {
        if sample < labeled.len() {
            labeled.shuffle(&mut thread_rng());
            labeled.truncate(sample);
            info!("Sampled {} labeled rows", labeled.len());
        }
    }
    if labeled.is_empty() {
        bail!("No usable labeled rows in {}", cli.labeled.display());
    }
    info!("Evaluating {} labeled rows", labeled.len());

    // Baseline: the production defaults, with a per-rule breakdown.
    let default_config = MatchConfig::default();
    let counts = evaluate(&index, default_config, &labeled);
    println!("\n--- Default config {:?} ---", default_config);
    print_counts(&counts);

    println!("\n--- Threshold sweep ---");
    let mut best: Option<(MatchConfig, f64)> = None;
    for min_acronym_len in SWEEP_MIN_ACRONYM_LENS {
        for min_key_token_len in SWEEP_MIN_KEY_TOKEN_LENS {
            for ambiguity_cap in SWEEP_AMBIGUITY_CAPS {
                let config = MatchConfig {
                    min_acronym_len,
                    min_key_token_len,
                    ambiguity_cap,
                };
                let counts = evaluate(&index, config, &labeled);
                println!(
                    "acronym>={} key_token>={} cap={} -> precision {:.4}, recall {:.4}, F1 {:.4}",
                    min_acronym_len,
                    min_key_token_len,
                    ambiguity_cap,
                    counts.precision(),
                    counts.recall(),
                    counts.f1()
                );
                let f1 = counts.f1();
                if best.map_or(true, |(_, best_f1)| f1 > best_f1) {
                    best = Some((config, f1));
                }
            }
        }
    }

    if let Some((config, f1)) = best {
        println!("\nBest F1 {:.4} with {:?}", f1, config);
        println!("Set MATCH_MIN_ACRONYM_LEN / MATCH_MIN_KEY_TOKEN_LEN / MATCH_AMBIGUITY_CAP accordingly.");
    }

    Ok(())
}

fn load_labeled_rows(cli: &Cli) -> Result<Vec<LabeledRow>> {
    let table = read_table(&cli.labeled)?;
    let expected_idx = table
        .column_index(&cli.expected_column)
        .with_context(|| {
            format!(
                "Labeled file has no '{}' column (columns: {:?})",
                cli.expected_column, table.headers
            )
        })?;
    let table = CandidateTable::from_raw(table, &cli.name_column, &cli.symbol_column)
        .context("Invalid labeled table")?;

    let mut rows = Vec::with_capacity(table.len());
    let mut skipped = 0usize;
    for row in table.rows() {
        let label = row
            .get(expected_idx)
            .map(String::as_str)
            .unwrap_or("")
            .trim()
            .to_lowercase();
        let expected_match = match label.as_str() {
            "match" | "true" | "1" | "yes" => true,
            "miss" | "false" | "0" | "no" => false,
            other => {
                warn!("Skipping row with unknown expected label {:?}", other);
                skipped += 1;
                continue;
            }
        };
        rows.push(LabeledRow {
            name: table.name(row).to_string(),
            symbol: table.symbol(row).to_string(),
            expected_match,
        });
    }
    if skipped > 0 {
        warn!("Skipped {} rows with unusable labels", skipped);
    }
    Ok(rows)
}

fn evaluate(index: &ReferenceIndex, config: MatchConfig, labeled: &[LabeledRow]) -> EvalCounts {
    let engine = MatchEngine::new(index, config);
    let mut counts = EvalCounts::default();

    for row in labeled {
        let outcome = engine.decide(&row.name, &row.symbol);
        match (outcome, row.expected_match) {
            (Some(rule), true) => {
                counts.true_positives += 1;
                *counts.tp_by_rule.entry(rule).or_insert(0) += 1;
            }
            (Some(rule), false) => {
                counts.false_positives += 1;
                *counts.fp_by_rule.entry(rule).or_insert(0) += 1;
            }
            (None, true) => counts.false_negatives += 1,
            (None, false) => counts.true_negatives += 1,
        }
    }
    counts
}

fn print_counts(counts: &EvalCounts) {
    println!(
        "TP {} / FP {} / TN {} / FN {}",
        counts.true_positives,
        counts.false_positives,
        counts.true_negatives,
        counts.false_negatives
    );
    println!(
        "precision {:.4}, recall {:.4}, F1 {:.4}",
        counts.precision(),
        counts.recall(),
        counts.f1()
    );
    for rule in MatchRule::ALL {
        let tp = counts.tp_by_rule.get(&rule).copied().unwrap_or(0);
        let fp = counts.fp_by_rule.get(&rule).copied().unwrap_or(0);
        if tp + fp > 0 {
            println!("  {}: {} correct, {} spurious", rule.as_str(), tp, fp);
        }
    }
}
