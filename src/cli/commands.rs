// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands and their flags:
//
//   series   — per-year means of one metric + trend curve
//   sessions — per-session means of one metric
//   stats    — documents and tokens per year
//   score    — on-demand scores for one year (what /scores returns)
//   serve    — the HTTP server
//
// Flags shared by every command live in CommonArgs and are
// #[command(flatten)]-ed in. Every shared flag is optional:
// when given it overrides the --config file, which in turn
// overrides the built-in defaults.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, MetricKind, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use anyhow::Result;
use clap::{Args, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::application::config::PipelineConfig;
use crate::data::preprocessor::LabelScope;
use crate::domain::metric::MetricKind;
use crate::metrics::likelihood::LikelihoodMode;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Per-year series of one metric, with a smoothed trend
    Series(SeriesArgs),

    /// Per-session means of one metric
    Sessions(SeriesArgs),

    /// Number of documents and tokens per year
    Stats(StatsArgs),

    /// Score every country of one year (no aggregation)
    Score(ScoreArgs),

    /// Serve GET /scores over HTTP
    Serve(ServeArgs),
}

/// Flags shared by every command.
#[derive(Args, Debug, Default)]
pub struct CommonArgs {
    /// JSON file with a PipelineConfig; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory containing the "Session NN - YYYY" folders
    #[arg(long)]
    pub corpus_dir: Option<PathBuf>,

    /// Year to leave out of series (repeatable; replaces the default 1948, 1949)
    #[arg(long = "deny-year")]
    pub deny_years: Vec<i32>,

    /// Keep every year, including the default deny-listed ones
    #[arg(long, conflicts_with = "deny_years")]
    pub no_deny: bool,

    /// Model directory (classifier_config.json, model.mpk.gz, tokenizer.json)
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// CMU pronouncing dictionary for syllable counts
    #[arg(long)]
    pub dictionary: Option<PathBuf>,

    /// Extra opinion-lexicon entries: word<TAB>polarity<TAB>subjectivity
    #[arg(long)]
    pub lexicon: Option<PathBuf>,

    /// Where enumeration labels are removed: line-start or anywhere
    #[arg(long)]
    pub label_scope: Option<LabelScope>,

    /// How fake-likelihood feeds the classifier: chunked or per-sentence
    #[arg(long)]
    pub likelihood_mode: Option<LikelihoodMode>,

    /// Classifier input budget in model tokens
    #[arg(long)]
    pub token_budget: Option<usize>,

    /// MATTR window for lexical-diversity
    #[arg(long)]
    pub lexical_window: Option<usize>,

    /// MATTR window for moving-ttr
    #[arg(long)]
    pub moving_ttr_window: Option<usize>,
}

impl CommonArgs {
    /// Resolve defaults ← config file ← flags.
    pub fn resolve(&self) -> Result<PipelineConfig> {
        let mut cfg = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(dir) = &self.corpus_dir {
            cfg.corpus_dir = dir.clone();
        }
        if self.no_deny {
            cfg.deny_years.clear();
        } else if !self.deny_years.is_empty() {
            cfg.deny_years = self.deny_years.clone();
        }
        if self.model_dir.is_some() {
            cfg.model_dir = self.model_dir.clone();
        }
        if self.dictionary.is_some() {
            cfg.dictionary = self.dictionary.clone();
        }
        if self.lexicon.is_some() {
            cfg.lexicon = self.lexicon.clone();
        }
        if let Some(scope) = self.label_scope {
            cfg.label_scope = scope;
        }
        if let Some(mode) = self.likelihood_mode {
            cfg.likelihood_mode = mode;
        }
        if let Some(n) = self.token_budget {
            cfg.token_budget = n;
        }
        if let Some(n) = self.lexical_window {
            cfg.lexical_window = n;
        }
        if let Some(n) = self.moving_ttr_window {
            cfg.moving_ttr_window = n;
        }

        tracing::debug!("Resolved config: {:?}", cfg);
        Ok(cfg)
    }
}

/// Arguments for `series` and `sessions`.
#[derive(Args, Debug)]
pub struct SeriesArgs {
    /// Metric selector, e.g. polarity, moving-ttr, fake-likelihood
    #[arg(long)]
    pub metric: MetricKind,

    /// Also write CSV files into this directory
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Polynomial degree of the trend curve
    #[arg(long)]
    pub degree: Option<usize>,

    /// Number of points in the resampled trend curve
    #[arg(long)]
    pub samples: Option<usize>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl SeriesArgs {
    pub fn resolve(&self) -> Result<PipelineConfig> {
        let mut cfg = self.common.resolve()?;
        if let Some(d) = self.degree {
            cfg.degree = d;
        }
        if let Some(s) = self.samples {
            cfg.samples = s;
        }
        Ok(cfg)
    }
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Also write corpus_stats.csv into this directory
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Session year
    #[arg(long, default_value_t = 1946)]
    pub year: i32,

    /// Metric selector
    #[arg(long, default_value = "polarity")]
    pub metric: MetricKind,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub addr: SocketAddr,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn parse(args: &[&str]) -> Commands {
        let mut argv = vec!["speech-metrics"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn test_series_flags_override_defaults() {
        let Commands::Series(args) = parse(&[
            "series", "--metric", "moving-ttr", "--corpus-dir", "/c",
            "--deny-year", "1950", "--deny-year", "1951", "--degree", "3",
            "--label-scope", "anywhere",
        ]) else {
            panic!("expected series");
        };
        assert_eq!(args.metric, MetricKind::MovingTypeTokenRatio);

        let cfg = args.resolve().unwrap();
        assert_eq!(cfg.corpus_dir, PathBuf::from("/c"));
        assert_eq!(cfg.deny_years, vec![1950, 1951]);
        assert_eq!(cfg.degree, 3);
        assert_eq!(cfg.samples, 500);
        assert_eq!(cfg.label_scope, LabelScope::Anywhere);
    }

    #[test]
    fn test_no_deny_clears_deny_list() {
        let Commands::Stats(args) = parse(&["stats", "--no-deny"]) else {
            panic!("expected stats");
        };
        assert!(args.common.resolve().unwrap().deny_years.is_empty());
    }

    #[test]
    fn test_score_defaults() {
        let Commands::Score(args) = parse(&["score"]) else {
            panic!("expected score");
        };
        assert_eq!(args.year, 1946);
        assert_eq!(args.metric, MetricKind::SentimentPolarity);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{ "corpus_dir": "/from-file", "token_budget": 256 }"#).unwrap();

        let common = CommonArgs {
            config:     Some(path),
            corpus_dir: Some(PathBuf::from("/from-flag")),
            ..Default::default()
        };
        let cfg = common.resolve().unwrap();
        assert_eq!(cfg.corpus_dir, PathBuf::from("/from-flag"));
        assert_eq!(cfg.token_budget, 256);
    }

    #[test]
    fn test_unknown_metric_is_rejected() {
        let argv = ["speech-metrics", "series", "--metric", "vibes"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
