// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from raw transcript files
// to the text units the metric calculators consume.
//
// The pipeline flows in this order:
//
//   Session NN - YYYY/*.txt
//       │
//       ▼
//   SessionFolderSource → enumerates sessions, reads files
//       │
//       ▼
//   Normalizer          → strips paragraph enumeration labels
//       │
//       ▼
//   Segmenter           → sentences, word tokens, whitespace tokens
//       │
//       ▼
//   Chunker             → token-budgeted chunks for the classifier
//
// Each module is responsible for exactly one step.
// This makes each step independently testable and replaceable.
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Reads "Session NN - YYYY" folders of .txt transcripts
pub mod loader;

/// Removes enumeration labels from raw text
pub mod preprocessor;

/// Unicode sentence and word segmentation
pub mod segmenter;

/// Splits long documents into classifier-sized chunks
pub mod chunker;
