use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;

use matching_lib::io::{load_reference_names, read_table, write_table};
use matching_lib::matching::refresh_unmatched;
use matching_lib::{CandidateTable, MatchConfig, MatchEngine, MatchStats, RawTable, ReferenceIndex};

#[derive(Parser)]
#[command(
    name = "matchcmd",
    about = "Company-name entity resolution against a reference database"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the candidate rows not found in the reference database
    Compare(RunArgs),
    /// Recompute the unmatched set and carry annotation columns over from a
    /// prior output
    Refresh(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Candidate CSV file
    #[arg(long)]
    candidates: PathBuf,

    /// Reference database JSON file
    #[arg(long)]
    reference: PathBuf,

    /// Output CSV file
    #[arg(long)]
    out: PathBuf,

    /// Prior output to carry annotations from (refresh only; defaults to the
    /// output path when it already exists)
    #[arg(long)]
    prior: Option<PathBuf>,

    /// Candidate column holding the company name
    #[arg(long, default_value = "Name")]
    name_column: String,

    /// Candidate column holding the ticker symbol
    #[arg(long, default_value = "Symbol")]
    symbol_column: String,

    /// Field holding the company name in the reference JSON records
    #[arg(long, default_value = "c")]
    reference_field: String,

    /// Override the minimum acronym length
    #[arg(long)]
    min_acronym_len: Option<usize>,

    /// Override the minimum key-token length
    #[arg(long)]
    min_key_token_len: Option<usize>,

    /// Override the key-token ambiguity cap
    #[arg(long)]
    ambiguity_cap: Option<usize>,
}

impl RunArgs {
    fn match_config(&self) -> MatchConfig {
        let mut config = MatchConfig::from_env();
        if let Some(v) = self.min_acronym_len {
            config.min_acronym_len = v;
        }
        if let Some(v) = self.min_key_token_len {
            config.min_key_token_len = v;
        }
        if let Some(v) = self.ambiguity_cap {
            config.ambiguity_cap = v;
        }
        config
    }
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Command::Compare(args) => run_compare(&args)?,
        Command::Refresh(args) => run_refresh(&args)?,
    }

    info!("Completed in {:.2?}", start.elapsed());
    Ok(())
}

fn load_inputs(args: &RunArgs) -> Result<(ReferenceIndex, CandidateTable)> {
    info!("Loading reference database {}", args.reference.display());
    let reference_names = load_reference_names(&args.reference, &args.reference_field)?;
    let index = ReferenceIndex::build(reference_names.iter().map(String::as_str));
    info!(
        "Reference index: {} distinct keys ({} blank records skipped)",
        index.len(),
        index.skipped_blank()
    );

    info!("Loading candidates {}", args.candidates.display());
    let candidates = read_table(&args.candidates)?;
    let candidates = CandidateTable::from_raw(candidates, &args.name_column, &args.symbol_column)
        .context("Invalid candidate table")?;
    info!("Candidate rows: {}", candidates.len());

    Ok((index, candidates))
}

fn candidate_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    pb.set_message("Matching candidates...");
    pb
}

fn run_compare(args: &RunArgs) -> Result<()> {
    let (index, candidates) = load_inputs(args)?;
    let engine = MatchEngine::new(&index, args.match_config());
    engine.config().log_config();

    let pb = candidate_progress_bar(candidates.len());
    let mut stats = MatchStats::default();
    let mut unmatched: Vec<Vec<String>> = Vec::new();
    for row in candidates.rows() {
        let outcome = engine.decide(candidates.name(row), candidates.symbol(row));
        stats.record(outcome);
        if outcome.is_none() {
            unmatched.push(row.clone());
        }
        pb.inc(1);
    }
    pb.finish_with_message(format!("{} unmatched", unmatched.len()));

    let output = RawTable {
        headers: candidates.headers().to_vec(),
        rows: unmatched,
    };
    write_table(&args.out, &output)?;

    stats.log_summary();
    info!(
        "Wrote {} unmatched rows to {}",
        output.rows.len(),
        args.out.display()
    );
    Ok(())
}

fn run_refresh(args: &RunArgs) -> Result<()> {
    let (index, candidates) = load_inputs(args)?;
    let engine = MatchEngine::new(&index, args.match_config());
    engine.config().log_config();

    let prior_path: Option<&Path> = match &args.prior {
        Some(path) => Some(path.as_path()),
        None if args.out.exists() => Some(args.out.as_path()),
        None => None,
    };

    let prior = match prior_path {
        Some(path) => {
            info!("Carrying annotations from prior output {}", path.display());
            let table = read_table(path)?;
            Some(
                CandidateTable::from_raw(table, &args.name_column, &args.symbol_column)
                    .context("Invalid prior output table")?,
            )
        }
        None => {
            info!("No prior output found; refresh behaves like a first run");
            None
        }
    };

    let mut stats = MatchStats::default();
    let outcome = refresh_unmatched(&candidates, prior.as_ref(), &engine, &mut stats);
    write_table(&args.out, &outcome.output)?;

    stats.log_summary();
    info!(
        "Wrote {} rows to {} ({} carried annotations, {} new)",
        outcome.output.rows.len(),
        args.out.display(),
        outcome.carried,
        outcome.fresh
    );
    Ok(())
}
