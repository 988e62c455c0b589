// ============================================================
// Layer 3 — Document Domain Type
// ============================================================
// One speech transcript from the corpus.
//
// A document is addressed by (year, session, country code) and
// carries the raw text exactly as it was read from disk. The
// normalised form (enumeration labels stripped) is computed the
// first time a metric asks for it and then reused, so running
// several metrics over the same document only normalises once.
//
// Reference: Rust Book §5 (Structs and Methods)
//            std::cell::OnceCell

use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::fmt;

use crate::data::preprocessor::Normalizer;

/// Identifies a document inside the corpus.
///
/// `document_id` is the country code taken from the file name,
/// e.g. `"AFG"` for `AFG_01_1946.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentKey {
    pub year:        i32,
    pub session_id:  String,
    pub document_id: String,
}

impl DocumentKey {
    pub fn new(year: i32, session_id: impl Into<String>, document_id: impl Into<String>) -> Self {
        Self {
            year,
            session_id:  session_id.into(),
            document_id: document_id.into(),
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.year, self.session_id, self.document_id)
    }
}

/// A raw transcript loaded from the corpus.
#[derive(Debug, Clone)]
pub struct Document {
    /// Where the document came from
    pub key: DocumentKey,

    /// The text as read from disk, never modified
    pub text: String,

    /// Lazily computed normalised text
    normalized: OnceCell<String>,
}

impl Document {
    pub fn new(key: DocumentKey, text: impl Into<String>) -> Self {
        Self {
            key,
            text:       text.into(),
            normalized: OnceCell::new(),
        }
    }

    /// Returns the normalised text, computing it on first use.
    pub fn normalized(&self, normalizer: &Normalizer) -> &str {
        self.normalized.get_or_init(|| normalizer.normalize(&self.text))
    }

    /// True when nothing but whitespace survives normalisation.
    /// Such documents are skipped by every metric.
    pub fn is_blank(&self, normalizer: &Normalizer) -> bool {
        self.normalized(normalizer).trim().is_empty()
    }
}
