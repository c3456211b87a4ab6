//! High-level IR (HIR) — identities, symbols and scopes.
//!
//! Everything that turns a set of documents into "what does this reference
//! point to" lives here. The layers are computed once per build and then
//! read concurrently.
//!
//! ## Key Types
//!
//! - [`IdentityProvider`] — Node, Local, Global and Reference IDs
//! - [`Description`] — an exported `name → node` binding
//! - [`WorkspaceIndex`] — every document's exports plus cached per-kind scopes
//! - [`ScopeProvider`] — builds the layered [`Scope`] for a reference site
//! - [`Diagnostic`] — unbindable references and duplicate ids
//!
//! ## Build Layers
//!
//! ```text
//! Document (parsed)
//!     │
//!     ▼
//! export_symbols(doc)          ← cache Global IDs, root-level exports
//!     │
//!     ▼
//! compute_local_symbols(doc)   ← container-scoped tables
//!     │
//!     ▼
//! plan/apply derived attrs     ← clone entity attributes onto views
//!     │
//!     ▼
//! ScopeProvider::resolve(site) ← layered lookup, first match wins
//!     │
//!     ▼
//! check_references(doc)        ← unresolved references
//! ```

mod diagnostics;
mod error;
mod identity;
mod index;
mod resolve;
mod scope;
mod symbols;
mod workspace;

pub use diagnostics::{
    Diagnostic, RelatedInfo, Severity, check_duplicate_ids, check_references, codes,
};
pub use error::ScopeError;
pub use identity::{IdentityProvider, find_next_id};
pub use index::WorkspaceIndex;
pub use resolve::{
    ReferenceContainer, ReferenceSite, ScopeProvider, SyntheticContainer, SyntheticElement,
};
pub use scope::Scope;
pub use symbols::{
    Description, DescriptionKind, DerivedAttributePlan, LocalSymbols, apply_derived_attributes,
    compute_local_symbols, export_symbols, plan_derived_attributes,
};
pub use workspace::{DocumentStore, Workspace};
