// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that name the concepts
// of the system: documents, metric kinds and results, year
// series, and the collaborator traits (corpus, tokenizer,
// classifier, sentiment lexicon).
//
// Rules for this layer:
//   - NO burn or tokenizers types
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A transcript and its corpus address
pub mod document;

// Metric kinds and per-document results
pub mod metric;

// Year series, trend curves and corpus statistics
pub mod series;

// Collaborator abstractions implemented by other layers
pub mod traits;
