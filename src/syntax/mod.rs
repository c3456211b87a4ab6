//! Syntax: the AST the engine works on.
//!
//! Parsing is an external concern. Callers hand in [`Document`]s built with
//! [`DocumentBuilder`]; every node lives in its document's arena and
//! cross-document links are [`Reference`]s resolved later.

mod document;
mod kind;
mod node;

pub use document::{Ancestors, Document, DocumentBuilder};
pub use kind::{NodeKind, Property};
pub use node::{AstNode, Reference};
