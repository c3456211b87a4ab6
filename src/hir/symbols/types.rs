//! Symbol descriptions produced by export and consumed by scope resolution.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{DataModelId, NodePtr};
use crate::syntax::NodeKind;

/// Which id form a description is indexed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DescriptionKind {
    /// Qualified within the owning data model (no reference-name prefix).
    Local,
    /// Prefixed with the owning data model's reference name.
    Global,
}

/// An exported `name → node` binding.
///
/// A node exported under both id forms yields two descriptions that differ
/// only in `name` and `kind`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Description {
    pub name: SmolStr,
    pub node_kind: NodeKind,
    pub node: NodePtr,
    pub document_uri: Arc<str>,
    pub data_model: Option<DataModelId>,
    pub kind: DescriptionKind,
}

impl Description {
    pub fn is_local(&self) -> bool {
        self.kind == DescriptionKind::Local
    }

    pub fn is_global(&self) -> bool {
        self.kind == DescriptionKind::Global
    }
}
