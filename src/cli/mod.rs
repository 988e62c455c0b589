// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Results go to stdout as pretty JSON so they can be piped
// into a plotting script; --out-dir additionally writes CSV.
// Logs go to stderr through tracing.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;

use commands::{Commands, ScoreArgs, SeriesArgs, ServeArgs, StatsArgs};

use crate::api::{self, AppState};
use crate::application::config::PipelineConfig;
use crate::application::score_use_case::{ScoreError, ScoreUseCase};
use crate::application::series_use_case::SeriesUseCase;
use crate::data::loader::SessionFolderSource;
use crate::infra::export::CsvExporter;

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "speech-metrics",
    version,
    about = "Linguistic metrics over session transcripts, as yearly series or on demand."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Series(args)   => run_series(args),
            Commands::Sessions(args) => run_sessions(args),
            Commands::Stats(args)    => run_stats(args),
            Commands::Score(args)    => run_score(args),
            Commands::Serve(args)    => run_serve(args),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Handles the `series` subcommand.
fn run_series(args: SeriesArgs) -> Result<()> {
    let cfg = args.resolve()?;
    tracing::info!("Computing '{}' series over '{}'", args.metric, cfg.corpus_dir.display());

    let report = SeriesUseCase::new(&cfg)?.series(args.metric)?;

    if let Some(dir) = &args.out_dir {
        let out  = CsvExporter::new(dir)?;
        let name = args.metric.selector();
        out.write_series(name, &report.series)?;
        if let Some(curve) = &report.trend {
            out.write_trend(name, curve)?;
        }
    }

    print_json(&report)
}

/// Handles the `sessions` subcommand.
fn run_sessions(args: SeriesArgs) -> Result<()> {
    let cfg  = args.resolve()?;
    let rows = SeriesUseCase::new(&cfg)?.sessions(args.metric)?;

    if let Some(dir) = &args.out_dir {
        CsvExporter::new(dir)?.write_sessions(args.metric.selector(), &rows)?;
    }

    print_json(&rows)
}

/// Handles the `stats` subcommand.
fn run_stats(args: StatsArgs) -> Result<()> {
    let cfg   = args.common.resolve()?;
    let stats = SeriesUseCase::new(&cfg)?.stats()?;

    if let Some(dir) = &args.out_dir {
        CsvExporter::new(dir)?.write_stats(&stats)?;
    }

    print_json(&stats)
}

fn score_use_case(cfg: &PipelineConfig) -> Result<ScoreUseCase> {
    let engine = cfg.build_engine()?;
    Ok(ScoreUseCase::new(
        Arc::new(SessionFolderSource::new(&cfg.corpus_dir)),
        Arc::new(engine),
        cfg.normalizer(),
    ))
}

/// Handles the `score` subcommand.
fn run_score(args: ScoreArgs) -> Result<()> {
    let cfg      = args.common.resolve()?;
    let use_case = score_use_case(&cfg)?;

    match use_case.scores(args.year, args.metric) {
        Ok(scores) => print_json(&scores),
        Err(ScoreError::FolderNotFound { year }) => {
            anyhow::bail!("Folder not found: no session for {} under '{}'", year, cfg.corpus_dir.display())
        }
        Err(ScoreError::Corpus(e)) => Err(e),
    }
}

/// Handles the `serve` subcommand.
/// The classifier and lexicons are loaded once, before the
/// listener starts, and shared by every request.
fn run_serve(args: ServeArgs) -> Result<()> {
    let cfg   = args.common.resolve()?;
    let state = AppState::new(score_use_case(&cfg)?);

    let runtime = tokio::runtime::Runtime::new().context("Cannot start tokio runtime")?;
    runtime.block_on(api::serve(state, args.addr))
}
