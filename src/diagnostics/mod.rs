//! Structured diagnostics for extraction runs.
//!
//! Provides deterministic, sortable diagnostic types for degraded input and
//! per-episode failures. Nothing here aborts a batch: diagnostics are
//! collected, logged, and reported alongside the graphs.

pub mod extraction_diagnostics;

pub use extraction_diagnostics::{DiagnosticStage, ExtractionDiagnostic, WarningKind};
