// ============================================================
// Layer 2 — Score Use Case (on demand)
// ============================================================
// Answers "metric M for every country in year Y" straight from
// the raw transcripts: no aggregation, no smoothing, no deny
// list. This is what the HTTP server calls per request.
//
//   Step 1: Locate "Session NN - YYYY"   → FolderNotFound if absent
//   Step 2: Read each .txt document       → null on failure
//   Step 3: Normalise + score              → null if blank/unscorable
//
// The use case is shared between requests, so everything it
// holds is immutable and Send + Sync.

use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::data::preprocessor::Normalizer;
use crate::domain::metric::MetricKind;
use crate::domain::traits::CorpusSource;
use crate::metrics::MetricEngine;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Folder not found")]
    FolderNotFound { year: i32 },

    #[error(transparent)]
    Corpus(#[from] anyhow::Error),
}

/// Country code → metric value (null when unscorable).
pub type Scores = BTreeMap<String, Option<f64>>;

pub struct ScoreUseCase {
    source:     Arc<dyn CorpusSource + Send + Sync>,
    engine:     Arc<MetricEngine>,
    normalizer: Normalizer,
}

impl ScoreUseCase {
    pub fn new(
        source:     Arc<dyn CorpusSource + Send + Sync>,
        engine:     Arc<MetricEngine>,
        normalizer: Normalizer,
    ) -> Self {
        Self { source, engine, normalizer }
    }

    pub fn scores(&self, year: i32, metric: MetricKind) -> Result<Scores, ScoreError> {
        let listing = self
            .source
            .session(year)?
            .ok_or(ScoreError::FolderNotFound { year })?;

        let mut scores = Scores::new();
        for entry in &listing.entries {
            let value = match self.source.read(entry) {
                Ok(document) => {
                    self.engine
                        .score_document(metric, &document, &self.normalizer)
                        .value
                }
                Err(e) => {
                    tracing::warn!("{}: unreadable: {:#}", entry.key, e);
                    None
                }
            };
            scores.insert(entry.key.document_id.clone(), value);
        }

        tracing::info!(
            "Scored {} documents for {} ({})",
            scores.len(),
            year,
            metric
        );
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::SessionFolderSource;
    use crate::test_support::CorpusBuilder;

    fn use_case(root: &std::path::Path) -> ScoreUseCase {
        ScoreUseCase::new(
            Arc::new(SessionFolderSource::new(root)),
            Arc::new(MetricEngine::default()),
            Normalizer::default(),
        )
    }

    #[test]
    fn test_scores_per_country() {
        let corpus = CorpusBuilder::new()
            .document(1946, "AFG_01_1946.txt", "1. The war is bad.\n2. It harms people.")
            .document(1946, "ALB_01_1946.txt", "We are glad.")
            .document(1946, "BEL_01_1946.txt", "  ")
            .build();

        let scores = use_case(corpus.path()).scores(1946, MetricKind::SentenceLength).unwrap();
        assert_eq!(scores.len(), 3);
        assert_eq!(scores["AFG"], Some(3.5));
        assert_eq!(scores["ALB"], Some(3.0));
        assert_eq!(scores["BEL"], None);
    }

    #[test]
    fn test_missing_folder_is_not_found() {
        let corpus = CorpusBuilder::new().document(1946, "AFG_01_1946.txt", "x").build();
        let err = use_case(corpus.path()).scores(1999, MetricKind::SentimentPolarity).unwrap_err();
        assert!(matches!(err, ScoreError::FolderNotFound { year: 1999 }));
        assert_eq!(err.to_string(), "Folder not found");
    }

    #[test]
    fn test_out_of_range_years_are_not_found() {
        let corpus = CorpusBuilder::new().document(1946, "AFG_01_1946.txt", "x").build();
        let uc     = use_case(corpus.path());
        for year in [i32::MIN, -1, 0, 1900, 1945, i32::MAX] {
            let err = uc.scores(year, MetricKind::TokenCount).unwrap_err();
            assert!(matches!(err, ScoreError::FolderNotFound { .. }), "{year}");
        }
    }

    #[test]
    fn test_empty_folder_is_empty_map() {
        let corpus = CorpusBuilder::new().empty_session(1950).build();
        let scores = use_case(corpus.path()).scores(1950, MetricKind::TokenCount).unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn test_deny_listed_years_are_still_served() {
        let corpus = CorpusBuilder::new().document(1948, "USA_03_1948.txt", "Hello there.").build();
        let scores = use_case(corpus.path()).scores(1948, MetricKind::TokenCount).unwrap();
        assert_eq!(scores["USA"], Some(2.0));
    }

    #[test]
    fn test_unreadable_file_is_null() {
        let corpus = CorpusBuilder::new().document(1946, "AFG_01_1946.txt", "Fine.").build();
        let session = corpus.path().join("Session 01 - 1946");
        std::fs::write(session.join("BAD_01_1946.txt"), [0xff, 0xfe]).unwrap();

        let scores = use_case(corpus.path()).scores(1946, MetricKind::TokenCount).unwrap();
        assert_eq!(scores["AFG"], Some(1.0));
        assert_eq!(scores["BAD"], None);
    }
}
