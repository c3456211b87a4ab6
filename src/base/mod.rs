//! Foundation types for the CrossModel engine.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`DocumentId`], [`NodeId`], [`NodePtr`] - Arena handles for AST nodes
//! - [`DataModelId`] - Identity of a data model (package)
//! - Id separator constants and proposal normalization
//!
//! This module has NO dependencies on other crossmodel modules.

pub mod constants;
mod ids;

pub use ids::{DataModelId, DocumentId, NodeId, NodePtr};
