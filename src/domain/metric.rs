// ============================================================
// Layer 3 — Metric Kinds and Results
// ============================================================
// Every metric the pipeline can compute is one variant of
// MetricKind. The kebab-case selector string ("polarity",
// "moving-ttr", ...) is what the CLI and the HTTP API accept.
//
// A MetricResult is the scalar produced for one document.
// `value` is None when the document could not be scored
// (empty text, zero sentences, classifier failure, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::document::DocumentKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricKind {
    /// Mean number of word tokens per sentence
    SentenceLength,
    /// MATTR over whitespace tokens (document-level window)
    LexicalDiversity,
    /// MATTR over lower-cased word tokens (corpus-level window)
    #[serde(rename = "moving-ttr")]
    MovingTypeTokenRatio,
    /// Share of negation words
    NegationRate,
    /// Share of first-person-singular pronouns
    FirstPersonRate,
    /// Meaningful numbers per word token
    NumberDensity,
    /// Opinion-lexicon polarity in [-1, 1]
    #[serde(rename = "polarity")]
    SentimentPolarity,
    /// Opinion-lexicon subjectivity in [0, 1]
    Subjectivity,
    /// Flesch reading ease
    ReadingEase,
    /// Mean "fake" probability from the classifier
    FakeLikelihood,
    /// Number of whitespace-delimited tokens
    TokenCount,
}

impl MetricKind {
    pub const ALL: [MetricKind; 11] = [
        MetricKind::SentenceLength,
        MetricKind::LexicalDiversity,
        MetricKind::MovingTypeTokenRatio,
        MetricKind::NegationRate,
        MetricKind::FirstPersonRate,
        MetricKind::NumberDensity,
        MetricKind::SentimentPolarity,
        MetricKind::Subjectivity,
        MetricKind::ReadingEase,
        MetricKind::FakeLikelihood,
        MetricKind::TokenCount,
    ];

    /// The selector string used on the command line and in query strings.
    pub fn selector(self) -> &'static str {
        match self {
            MetricKind::SentenceLength       => "sentence-length",
            MetricKind::LexicalDiversity     => "lexical-diversity",
            MetricKind::MovingTypeTokenRatio => "moving-ttr",
            MetricKind::NegationRate         => "negation-rate",
            MetricKind::FirstPersonRate      => "first-person-rate",
            MetricKind::NumberDensity        => "number-density",
            MetricKind::SentimentPolarity    => "polarity",
            MetricKind::Subjectivity         => "subjectivity",
            MetricKind::ReadingEase          => "reading-ease",
            MetricKind::FakeLikelihood       => "fake-likelihood",
            MetricKind::TokenCount           => "token-count",
        }
    }

    /// Whether computing this metric needs the classifier model.
    pub fn needs_classifier(self) -> bool {
        matches!(self, MetricKind::FakeLikelihood)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

impl FromStr for MetricKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        MetricKind::ALL
            .into_iter()
            .find(|k| k.selector() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = MetricKind::ALL.iter().map(|k| k.selector()).collect();
                anyhow::anyhow!("unknown metric '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// The value one metric produced for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub kind:     MetricKind,
    pub document: DocumentKey,
    pub value:    Option<f64>,
}

impl MetricResult {
    pub fn new(kind: MetricKind, document: DocumentKey, value: Option<f64>) -> Self {
        Self { kind, document, value }
    }

    pub fn is_defined(&self) -> bool {
        self.value.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_round_trips_through_from_str() {
        for kind in MetricKind::ALL {
            assert_eq!(kind.selector().parse::<MetricKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_serde_name_matches_selector() {
        for kind in MetricKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.selector()));
        }
    }

    #[test]
    fn test_unknown_selector_is_rejected() {
        let err = "swear-rate".parse::<MetricKind>().unwrap_err();
        assert!(err.to_string().contains("unknown metric"));
    }

    #[test]
    fn test_only_likelihood_needs_classifier() {
        let needing: Vec<_> = MetricKind::ALL.into_iter().filter(|k| k.needs_classifier()).collect();
        assert_eq!(needing, vec![MetricKind::FakeLikelihood]);
    }
}
