//! # crossmodel-base
//!
//! Cross-document symbol resolution for CrossModel data models: identities,
//! symbol export, scope resolution and derived attribute propagation.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → AnalysisHost build pipeline, completion, diagnostics entry points
//!   ↓
//! hir       → Identities, symbol export, workspace index, scope resolution
//!   ↓
//! project   → Data-model registry (ownership, visibility, versions)
//!   ↓
//! syntax    → Arena AST: Document, AstNode, Reference, NodeKind
//!   ↓
//! base      → Primitives (DocumentId, NodeId, NodePtr, DataModelId)
//! ```

// ============================================================================
// MODULES (dependency order: base → syntax → project → hir → ide)
// ============================================================================

/// Foundation types: arena handles, data model ids, id constants
pub mod base;

/// Syntax: documents, nodes, references, node kinds
pub mod syntax;

/// Project management: data-model registry
pub mod project;

/// High-level IR: identities, symbols, scopes
pub mod hir;

/// IDE features: analysis host, completion, diagnostics
pub mod ide;

// Re-export foundation types
pub use base::{DataModelId, DocumentId, NodeId, NodePtr};
