//! Errors raised inside scope resolution.
//!
//! None of these escape the public entry points: `ScopeProvider::scope`,
//! `resolve` and the completion helpers log them and fall back to the empty
//! scope.

use thiserror::Error;

use crate::base::{DocumentId, NodeId};
use crate::syntax::{NodeKind, Property};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("unknown document {0:?}")]
    UnknownDocument(DocumentId),

    #[error("no document with uri '{0}'")]
    UnknownUri(String),

    #[error("node {node:?} does not exist in document {document:?}")]
    UnknownNode { document: DocumentId, node: NodeId },

    #[error("no container with global id '{anchor}' in '{uri}'")]
    UnknownAnchor { anchor: String, uri: String },

    #[error("{kind} has no reference property '{property}'")]
    InvalidProperty { kind: NodeKind, property: Property },
}
