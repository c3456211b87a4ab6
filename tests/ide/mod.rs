//! IDE layer tests
//!
//! - AnalysisHost rebuild behavior
//! - Completion post-processing
//! - Linking and diagnostics
//! - Concurrent resolution against one snapshot

pub mod tests_analysis;
pub mod tests_concurrency;
pub mod tests_diagnostics;
