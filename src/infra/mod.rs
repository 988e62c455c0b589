// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Handles all cross-cutting concerns that don't belong in
// any specific business layer:
//
//   checkpoint.rs      — Loading and saving model weights
//                        Uses Burn's CompactRecorder for the
//                        parameters and a JSON manifest for the
//                        architecture and label set.
//
//   tokenizer_store.rs — Tokenizer loading
//                        Reads the HuggingFace tokenizer.json
//                        shipped with the model and exposes it
//                        as a TokenCounter for chunking.
//
//   pronouncing.rs     — CMU Pronouncing Dictionary
//                        Syllable counts for reading ease.
//
//   export.rs          — CSV export
//                        Writes year series, trend curves and
//                        corpus statistics for plotting.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model manifest and weights loading
pub mod checkpoint;

/// Tokenizer loading and token counting
pub mod tokenizer_store;

/// Pronouncing dictionary parsing
pub mod pronouncing;

/// Series and curve CSV writer
pub mod export;
