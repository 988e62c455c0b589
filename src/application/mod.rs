// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (a year series, or on-demand scores).
//
// Rules for this layer:
//   - No metric math or model code here
//   - No UI or printing here (that's Layer 1)
//   - No direct file access (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Think of this layer as the "director" — it tells other
// layers what to do but doesn't do the work itself.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Run configuration shared by every command
pub mod config;

// The batch workflow: series, sessions, corpus statistics
pub mod series_use_case;

// The on-demand workflow behind the HTTP server
pub mod score_use_case;
