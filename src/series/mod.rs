// ============================================================
// Layer 4b — Series Layer
// ============================================================
// Turns per-document metric results into the year-indexed
// shapes a plotting tool consumes:
//
//   aggregator.rs — corpus walk + per-year / per-session means
//   trend.rs      — degree-5 polynomial fit and dense resample
//
// Reference: Rust Book §8 (Collections)

/// Corpus walk and per-year aggregation
pub mod aggregator;

/// Polynomial trend fitting
pub mod trend;
