//! Arena handles and package identities.

use std::fmt;

use smol_str::SmolStr;

/// Identifier of a document inside a workspace.
///
/// Assigned by the host when a document is added; stable until the
/// document is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(u32);

impl DocumentId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Index of a node inside its document's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The document root always lives at index 0.
    pub const ROOT: NodeId = NodeId(0);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Workspace-wide handle to a node: document plus arena index.
///
/// This is what a resolved reference points to. It never owns the node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePtr {
    pub document: DocumentId,
    pub node: NodeId,
}

impl NodePtr {
    pub const fn new(document: DocumentId, node: NodeId) -> Self {
        Self { document, node }
    }
}

/// Stable identity of a data model (package).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DataModelId(SmolStr);

impl DataModelId {
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DataModelId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
