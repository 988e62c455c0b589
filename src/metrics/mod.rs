// ============================================================
// Metric Calculators
// ============================================================
// One scalar per document per metric. Every calculator is a
// plain function of the (normalised) text that returns
// Option<f64>: None when the text has nothing to divide by
// (no tokens, no sentences, no classifier inputs).
//
//   lexical.rs     — MATTR, closed-class rates, sentence length
//   numbers.rs     — meaningful-number density
//   readability.rs — Flesch reading ease + syllable counting
//   sentiment.rs   — opinion-lexicon polarity / subjectivity
//   likelihood.rs  — mean "fake" probability from the classifier
//
// MetricEngine owns the shared pieces (segmenter, regexes,
// lexicon, optional classifier) and dispatches on MetricKind.
// It is built once and shared read-only, so the HTTP server
// can hand the same engine to every request.

pub mod lexical;
pub mod likelihood;
pub mod numbers;
pub mod readability;
pub mod sentiment;

use anyhow::{bail, Result};
use std::sync::Arc;

use crate::data::chunker::{Chunker, DEFAULT_TOKEN_BUDGET};
use crate::data::preprocessor::Normalizer;
use crate::data::segmenter::Segmenter;
use crate::domain::document::Document;
use crate::domain::metric::{MetricKind, MetricResult};
use crate::domain::traits::{Classifier, OpinionScorer};

use likelihood::LikelihoodMode;
use numbers::NumberMatcher;
use readability::SyllableCounter;
use sentiment::LexiconScorer;

/// Tunable parameters of the calculators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSettings {
    /// MATTR window for lexical-diversity
    pub lexical_window:    usize,
    /// MATTR window for moving-ttr
    pub moving_ttr_window: usize,
    /// Classifier input budget in model tokens
    pub token_budget:      usize,
    pub likelihood_mode:   LikelihoodMode,
}

impl Default for MetricSettings {
    fn default() -> Self {
        Self {
            lexical_window:    lexical::DOCUMENT_WINDOW,
            moving_ttr_window: lexical::CORPUS_WINDOW,
            token_budget:      DEFAULT_TOKEN_BUDGET,
            likelihood_mode:   LikelihoodMode::Chunked,
        }
    }
}

pub struct MetricEngine {
    settings:   MetricSettings,
    segmenter:  Segmenter,
    numbers:    NumberMatcher,
    syllables:  SyllableCounter,
    opinion:    Arc<dyn OpinionScorer>,
    classifier: Option<Arc<dyn Classifier>>,
    chunker:    Chunker,
}

impl MetricEngine {
    /// Engine with the bundled lexicon, heuristic syllables and no classifier.
    pub fn new(settings: MetricSettings) -> Self {
        Self {
            settings,
            segmenter:  Segmenter::new(),
            numbers:    NumberMatcher::new(),
            syllables:  SyllableCounter::heuristic(),
            opinion:    Arc::new(LexiconScorer::new()),
            classifier: None,
            chunker:    Chunker::new(settings.token_budget.max(1)),
        }
    }

    /// Attach a classifier. The chunk budget shrinks to the
    /// classifier's input limit when that is smaller.
    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        let budget = self.settings.token_budget.min(classifier.max_tokens()).max(1);
        self.chunker = Chunker::new(budget);
        self.classifier = Some(classifier);
        self
    }

    pub fn with_opinion_scorer(mut self, opinion: Arc<dyn OpinionScorer>) -> Self {
        self.opinion = opinion;
        self
    }

    pub fn with_syllables(mut self, syllables: SyllableCounter) -> Self {
        self.syllables = syllables;
        self
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Compute one metric over already-normalised text.
    ///
    /// Ok(None) means "nothing to measure"; Err means the
    /// measurement itself failed (classifier or tokenizer).
    pub fn compute(&self, kind: MetricKind, text: &str) -> Result<Option<f64>> {
        let seg = &self.segmenter;

        let value = match kind {
            MetricKind::SentenceLength => lexical::average_sentence_length(seg, text),

            MetricKind::LexicalDiversity => {
                let tokens: Vec<&str> = seg.whitespace_tokens(text).collect();
                lexical::mattr(&tokens, self.settings.lexical_window)
            }

            MetricKind::MovingTypeTokenRatio => {
                let tokens: Vec<String> = seg.lower_words(text).collect();
                lexical::mattr(&tokens, self.settings.moving_ttr_window)
            }

            MetricKind::NegationRate => {
                let tokens: Vec<String> = seg.lower_words(text).collect();
                lexical::closed_class_rate(&tokens, lexical::NEGATION_WORDS)
            }

            MetricKind::FirstPersonRate => {
                let tokens: Vec<String> = seg.lower_words(text).collect();
                lexical::closed_class_rate(&tokens, lexical::FIRST_PERSON_SINGULAR)
            }

            MetricKind::NumberDensity => self.numbers.density(seg, text),

            MetricKind::SentimentPolarity => self.opinion.score(text).map(|o| o.polarity),

            MetricKind::Subjectivity => self.opinion.score(text).map(|o| o.subjectivity),

            MetricKind::ReadingEase => readability::reading_ease(seg, &self.syllables, text),

            MetricKind::FakeLikelihood => {
                let Some(classifier) = &self.classifier else {
                    bail!("metric '{}' needs a classifier model (--model-dir)", kind);
                };
                return likelihood::fake_likelihood(
                    text,
                    classifier.as_ref(),
                    &self.chunker,
                    self.settings.likelihood_mode,
                    seg,
                );
            }

            MetricKind::TokenCount => {
                let n = seg.whitespace_tokens(text).count();
                if n == 0 { None } else { Some(n as f64) }
            }
        };

        Ok(value)
    }

    /// Score one document. Never fails: blank documents and
    /// measurement errors both become an absent value.
    pub fn score_document(
        &self,
        kind:       MetricKind,
        document:   &Document,
        normalizer: &Normalizer,
    ) -> MetricResult {
        if document.is_blank(normalizer) {
            tracing::debug!("{}: blank after normalisation, skipped", document.key);
            return MetricResult::new(kind, document.key.clone(), None);
        }

        let value = match self.compute(kind, document.normalized(normalizer)) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("{}: {} failed: {:#}", document.key, kind, e);
                None
            }
        };
        MetricResult::new(kind, document.key.clone(), value)
    }
}

impl Default for MetricEngine {
    fn default() -> Self {
        Self::new(MetricSettings::default())
    }
}
