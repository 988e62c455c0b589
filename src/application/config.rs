// ============================================================
// Layer 2 — Pipeline Configuration
// ============================================================
// Every tunable of a run in one serialisable struct.
//
// Sources, lowest priority first:
//   1. PipelineConfig::default()
//   2. a JSON file given with --config
//   3. explicit command-line flags
//
// The #[derive(Serialize, Deserialize)] macros from serde handle
// reading/writing this struct to JSON automatically, and
// #[serde(default)] lets a config file name only the fields it
// wants to change.
//
// build_engine() turns the paths in here into loaded resources
// (classifier, dictionary, lexicon) exactly once per process.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::data::chunker::DEFAULT_TOKEN_BUDGET;
use crate::data::preprocessor::{LabelScope, Normalizer};
use crate::infra::pronouncing::PronouncingDictionary;
use crate::metrics::likelihood::LikelihoodMode;
use crate::metrics::readability::SyllableCounter;
use crate::metrics::sentiment::LexiconScorer;
use crate::metrics::{lexical, MetricEngine, MetricSettings};
use crate::ml::classifier::BurnClassifier;
use crate::series::aggregator::YearPolicy;
use crate::series::trend::{TrendSmoother, DEFAULT_DEGREE, DEFAULT_SAMPLES};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding the "Session NN - YYYY" folders
    pub corpus_dir:        PathBuf,
    /// Years left out of every series
    pub deny_years:        Vec<i32>,
    pub lexical_window:    usize,
    pub moving_ttr_window: usize,
    pub token_budget:      usize,
    /// Polynomial degree of the trend curve
    pub degree:            usize,
    /// Points in the resampled trend curve
    pub samples:           usize,
    pub label_scope:       LabelScope,
    pub likelihood_mode:   LikelihoodMode,
    /// Model directory for fake-likelihood
    pub model_dir:         Option<PathBuf>,
    /// CMU pronouncing dictionary for syllable counts
    pub dictionary:        Option<PathBuf>,
    /// Extra opinion-lexicon entries (TSV)
    pub lexicon:           Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            corpus_dir:        PathBuf::from("data/transcripts"),
            deny_years:        vec![1948, 1949],
            lexical_window:    lexical::DOCUMENT_WINDOW,
            moving_ttr_window: lexical::CORPUS_WINDOW,
            token_budget:      DEFAULT_TOKEN_BUDGET,
            degree:            DEFAULT_DEGREE,
            samples:           DEFAULT_SAMPLES,
            label_scope:       LabelScope::LineStart,
            likelihood_mode:   LikelihoodMode::Chunked,
            model_dir:         None,
            dictionary:        None,
            lexicon:           None,
        }
    }
}

impl PipelineConfig {
    /// Load a JSON config file; missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed config file '{}'", path.display()))
    }

    pub fn policy(&self) -> YearPolicy {
        YearPolicy::new(self.deny_years.iter().copied())
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.label_scope)
    }

    pub fn smoother(&self) -> TrendSmoother {
        TrendSmoother::new(self.degree, self.samples)
    }

    pub fn settings(&self) -> MetricSettings {
        MetricSettings {
            lexical_window:    self.lexical_window,
            moving_ttr_window: self.moving_ttr_window,
            token_budget:      self.token_budget,
            likelihood_mode:   self.likelihood_mode,
        }
    }

    /// Build the metric engine, loading every configured resource.
    pub fn build_engine(&self) -> Result<MetricEngine> {
        if self.token_budget == 0 {
            anyhow::bail!("token_budget must be positive");
        }

        let mut engine = MetricEngine::new(self.settings());

        if let Some(path) = &self.dictionary {
            let dict = PronouncingDictionary::load(path)?;
            engine = engine.with_syllables(SyllableCounter::with_dictionary(Arc::new(dict)));
        }

        if let Some(path) = &self.lexicon {
            let mut scorer = LexiconScorer::new();
            scorer.load_extra(path)?;
            engine = engine.with_opinion_scorer(Arc::new(scorer));
        }

        if let Some(dir) = &self.model_dir {
            let classifier = BurnClassifier::load(dir)
                .with_context(|| format!("Cannot load classifier from '{}'", dir.display()))?;
            engine = engine.with_classifier(Arc::new(classifier));
        }

        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(
            &path,
            r#"{ "corpus_dir": "/corpus", "deny_years": [], "label_scope": "anywhere" }"#,
        )
        .unwrap();

        let cfg = PipelineConfig::load(&path).unwrap();
        assert_eq!(cfg.corpus_dir, PathBuf::from("/corpus"));
        assert!(cfg.deny_years.is_empty());
        assert_eq!(cfg.label_scope, LabelScope::Anywhere);
        assert_eq!(cfg.degree, 5);
        assert_eq!(cfg.token_budget, 512);
        assert!(!cfg.policy().is_denied(1948));
    }

    #[test]
    fn test_unknown_enum_value_is_rejected() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(&path, r#"{ "likelihood_mode": "by-paragraph" }"#).unwrap();
        assert!(PipelineConfig::load(&path).is_err());
    }

    #[test]
    fn test_default_policy_and_settings() {
        let cfg = PipelineConfig::default();
        assert!(cfg.policy().is_denied(1948));
        assert!(cfg.policy().is_denied(1949));
        assert_eq!(cfg.settings(), MetricSettings::default());
        assert_eq!(cfg.smoother(), TrendSmoother::default());
    }

    #[test]
    fn test_engine_without_model_has_no_classifier() {
        let engine = PipelineConfig::default().build_engine().unwrap();
        assert!(!engine.has_classifier());
    }

    #[test]
    fn test_engine_with_bad_model_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = PipelineConfig { model_dir: Some(dir.path().join("missing")), ..Default::default() };
        assert!(cfg.build_engine().is_err());
    }

    #[test]
    fn test_engine_with_tiny_model() {
        let dir = tempfile::tempdir().unwrap();
        crate::test_support::write_tiny_model(dir.path(), &["peace"], 16).unwrap();
        let cfg = PipelineConfig { model_dir: Some(dir.path().to_path_buf()), ..Default::default() };
        let engine = cfg.build_engine().unwrap();
        assert!(engine.has_classifier());
    }
}
