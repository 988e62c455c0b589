// ============================================================
// Layer 2 — Series Use Case
// ============================================================
// Orchestrates the batch pipeline for one metric:
//
//   Step 1: Enumerate sessions        (Layer 4 - data)
//   Step 2: Normalise + score docs    (metrics)
//   Step 3: Fold into year means      (Layer 4b - series)
//   Step 4: Fit the trend curve       (Layer 4b - series)
//
// A failed fit is not an error: the raw series is still
// returned and the curve is left out.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{bail, Result};
use serde::Serialize;

use crate::application::config::PipelineConfig;
use crate::data::loader::SessionFolderSource;
use crate::data::preprocessor::Normalizer;
use crate::domain::metric::{MetricKind, MetricResult};
use crate::domain::series::{SessionMean, SmoothedCurve, YearSeries, YearStats};
use crate::domain::traits::CorpusSource;
use crate::metrics::MetricEngine;
use crate::series::aggregator::{
    aggregate_by_session, aggregate_by_year, corpus_stats, CorpusAggregator, YearPolicy,
};
use crate::series::trend::TrendSmoother;

/// The per-year series of one metric, plus its trend curve when
/// there were enough years to fit one.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesReport {
    pub metric: MetricKind,
    pub series: YearSeries,
    pub trend:  Option<SmoothedCurve>,
}

pub struct SeriesUseCase {
    source:     Box<dyn CorpusSource>,
    engine:     MetricEngine,
    normalizer: Normalizer,
    policy:     YearPolicy,
    smoother:   TrendSmoother,
}

impl SeriesUseCase {
    /// Build from config: reads the corpus folder and loads every
    /// configured resource (model, dictionary, lexicon).
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let engine = config.build_engine()?;
        Ok(Self::from_parts(
            Box::new(SessionFolderSource::new(&config.corpus_dir)),
            engine,
            config,
        ))
    }

    pub fn from_parts(
        source: Box<dyn CorpusSource>,
        engine: MetricEngine,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            source,
            engine,
            normalizer: config.normalizer(),
            policy:     config.policy(),
            smoother:   config.smoother(),
        }
    }

    fn collect(&self, kind: MetricKind) -> Result<Vec<MetricResult>> {
        if kind.needs_classifier() && !self.engine.has_classifier() {
            bail!("metric '{}' needs a classifier model; pass --model-dir", kind);
        }
        CorpusAggregator::new(self.source.as_ref(), &self.engine, &self.normalizer, &self.policy)
            .collect(kind)
    }

    /// Per-year means of `kind` with the fitted trend.
    pub fn series(&self, kind: MetricKind) -> Result<SeriesReport> {
        let results = self.collect(kind)?;
        let series  = aggregate_by_year(&results, &self.policy);

        let trend = match self.smoother.fit(&series) {
            Ok(curve) => Some(curve),
            Err(e) => {
                tracing::warn!("No trend for {}: {}", kind, e);
                None
            }
        };

        tracing::info!("{}: {} years in series", kind, series.len());
        Ok(SeriesReport { metric: kind, series, trend })
    }

    /// Per-session means of `kind`.
    pub fn sessions(&self, kind: MetricKind) -> Result<Vec<SessionMean>> {
        let results = self.collect(kind)?;
        Ok(aggregate_by_session(&results, &self.policy))
    }

    /// Document count and token total per year.
    pub fn stats(&self) -> Result<Vec<YearStats>> {
        let results = self.collect(MetricKind::TokenCount)?;
        Ok(corpus_stats(&results, &self.policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CorpusBuilder;

    fn use_case(corpus: &std::path::Path, config: PipelineConfig) -> SeriesUseCase {
        let config = PipelineConfig { corpus_dir: corpus.to_path_buf(), ..config };
        SeriesUseCase::new(&config).unwrap()
    }

    fn six_year_corpus() -> tempfile::TempDir {
        let mut b = CorpusBuilder::new();
        for (i, year) in [1946, 1947, 1948, 1950, 1951, 1952, 1953, 1954].into_iter().enumerate() {
            let text = "word ".repeat(i + 1);
            b = b.document(year, &format!("AFG_{:02}_{}.txt", year - 1945, year), &text);
        }
        b.build()
    }

    #[test]
    fn test_series_with_trend() {
        let corpus = six_year_corpus();
        let uc     = use_case(corpus.path(), PipelineConfig::default());
        let report = uc.series(MetricKind::TokenCount).unwrap();

        // 1948 deny-listed, 1949 absent
        assert_eq!(report.series.years(), &[1946, 1947, 1950, 1951, 1952, 1953, 1954]);
        assert_eq!(report.series.get(1946), Some(1.0));
        assert_eq!(report.series.get(1954), Some(8.0));
        let trend = report.trend.unwrap();
        assert_eq!(trend.xs.len(), 500);
    }

    #[test]
    fn test_series_without_enough_years_has_no_trend() {
        let corpus = CorpusBuilder::new()
            .document(1946, "AFG_01_1946.txt", "One two.")
            .document(1947, "AFG_02_1947.txt", "One two three.")
            .build();
        let uc     = use_case(corpus.path(), PipelineConfig::default());
        let report = uc.series(MetricKind::TokenCount).unwrap();
        assert_eq!(report.series.len(), 2);
        assert!(report.trend.is_none());
    }

    #[test]
    fn test_fake_likelihood_needs_model() {
        let corpus = six_year_corpus();
        let uc     = use_case(corpus.path(), PipelineConfig::default());
        let err    = uc.series(MetricKind::FakeLikelihood).unwrap_err();
        assert!(err.to_string().contains("--model-dir"));
    }

    #[test]
    fn test_stats_and_sessions() {
        let corpus = CorpusBuilder::new()
            .document(1946, "AFG_01_1946.txt", "a b c")
            .document(1946, "ALB_01_1946.txt", "d e")
            .document(1947, "AFG_02_1947.txt", "f")
            .build();
        let uc = use_case(corpus.path(), PipelineConfig { deny_years: vec![], ..Default::default() });

        let stats = uc.stats().unwrap();
        assert_eq!(stats[0], YearStats { year: 1946, documents: 2, tokens: 5 });
        assert_eq!(stats[1], YearStats { year: 1947, documents: 1, tokens: 1 });

        let sessions = uc.sessions(MetricKind::TokenCount).unwrap();
        assert_eq!(sessions[0].mean, 2.5);
        assert_eq!(sessions[1].session_id, "02");
    }

    #[test]
    fn test_missing_corpus_gives_empty_series() {
        let uc = use_case(std::path::Path::new("/no/such/corpus"), PipelineConfig::default());
        let report = uc.series(MetricKind::SentenceLength).unwrap();
        assert!(report.series.is_empty());
        assert!(report.trend.is_none());
    }
}
