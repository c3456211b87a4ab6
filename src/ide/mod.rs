//! IDE features — entry points for a language server.
//!
//! This module provides the interface between the semantic model (HIR) and
//! the editor-facing layer: building the workspace, resolving references,
//! offering completions and reporting diagnostics.
//!
//! ## Usage
//!
//! The recommended way to use this module is through `AnalysisHost`:
//!
//! ```ignore
//! use crossmodel::ide::AnalysisHost;
//!
//! let mut host = AnalysisHost::new(Arc::new(registry));
//! host.set_document(document);
//!
//! let analysis = host.analysis();
//! let candidates = analysis.completion_candidates(&site, CompletionOptions::default());
//! ```

mod analysis;
mod completion;

pub use analysis::{Analysis, AnalysisHost, HostConfig, IdScope, LinkSummary};
pub use completion::{
    CompletionItem, CompletionKind, CompletionOptions, completion_candidates, completions,
};
