// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The pipeline talks to everything it does not own through
// these traits:
//
//   CorpusSource   — enumerates sessions and reads transcripts
//                    (SessionFolderSource reads "Session NN - YYYY"
//                    folders; tests use an in-memory source)
//   TokenCounter   — counts model tokens, drives the Chunker
//   Classifier     — the opaque fake/real model
//   OpinionScorer  — the opaque sentiment lexicon
//
// Classifier and OpinionScorer are Send + Sync so one instance
// can be built at startup and shared by every HTTP request.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §17 (Trait Objects)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::document::{Document, DocumentKey};

// ─── CorpusSource ─────────────────────────────────────────────────────────────

/// One document in a session, not yet read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub key:      DocumentKey,
    pub location: PathBuf,
}

/// The documents of one session (one session per year).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionListing {
    pub year:       i32,
    pub session_id: String,
    pub entries:    Vec<DocumentEntry>,
}

/// Anything that can enumerate the corpus by year.
pub trait CorpusSource {
    /// Every year that has a session, ascending.
    fn years(&self) -> Result<Vec<i32>>;

    /// The session for `year`, or None when it does not exist.
    /// An existing but empty session yields Some with no entries.
    fn session(&self, year: i32) -> Result<Option<SessionListing>>;

    /// Read one document. Errors are per-document and never abort a batch.
    fn read(&self, entry: &DocumentEntry) -> Result<Document>;
}

// ─── TokenCounter ─────────────────────────────────────────────────────────────

/// Counts tokens the way the classifier's tokenizer does.
pub trait TokenCounter {
    fn count_tokens(&self, text: &str) -> Result<usize>;
}

// ─── Classifier ───────────────────────────────────────────────────────────────

/// A pretrained text classifier with a fixed label set.
pub trait Classifier: Send + Sync {
    /// Label names, in the order `classify` reports probabilities.
    fn labels(&self) -> &[String];

    /// Index of the "fake" label inside `labels()`.
    fn fake_index(&self) -> usize;

    /// Maximum number of model tokens one input may carry.
    fn max_tokens(&self) -> usize;

    /// The tokenizer the model uses, for budget-aware chunking.
    fn tokenizer(&self) -> &dyn TokenCounter;

    /// Probability distribution over `labels()` for one input.
    fn classify(&self, text: &str) -> Result<Vec<f32>>;

    /// Probability mass on the "fake" label.
    fn fake_probability(&self, text: &str) -> Result<f32> {
        let probs = self.classify(text)?;
        probs.get(self.fake_index()).copied().ok_or_else(|| {
            anyhow::anyhow!(
                "classifier returned {} probabilities, fake label index is {}",
                probs.len(),
                self.fake_index()
            )
        })
    }
}

// ─── OpinionScorer ────────────────────────────────────────────────────────────

/// Sentiment of a passage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Opinion {
    /// -1.0 (negative) ..= 1.0 (positive)
    pub polarity: f64,
    /// 0.0 (objective) ..= 1.0 (subjective)
    pub subjectivity: f64,
}

/// An opinion-lexicon sentiment scorer.
pub trait OpinionScorer: Send + Sync {
    /// None when the text has no scorable words at all.
    fn score(&self, text: &str) -> Option<Opinion>;
}
