//! Symbol export and container-local symbol tables.
//!
//! # Module structure
//!
//! - [`types`] — `Description` and `DescriptionKind`
//! - [`export`] — document-level export (what other documents can see)
//! - [`local`] — container-scoped tables (what the document itself sees)
//! - [`derived`] — derived attribute propagation onto entity views

mod derived;
mod export;
mod local;
mod types;


pub use derived::{DerivedAttributePlan, apply_derived_attributes, plan_derived_attributes};
pub use export::export_symbols;
pub use local::{LocalSymbols, compute_local_symbols};
pub use types::{Description, DescriptionKind};
