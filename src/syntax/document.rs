//! Documents: one arena-allocated node tree per model file.

use std::sync::Arc;

use super::kind::NodeKind;
use super::node::AstNode;
use crate::base::{DocumentId, NodeId, NodePtr};

/// A parsed model file.
///
/// Node `0` is the root. Nodes produced by parsing come first in the arena;
/// derived attributes are appended behind them during symbol export so a
/// rebuild can drop them all with one truncation.
#[derive(Clone, Debug)]
pub struct Document {
    id: DocumentId,
    uri: Arc<str>,
    nodes: Vec<AstNode>,
    parsed_len: usize,
}

impl Document {
    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: DocumentId) {
        self.id = id;
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn uri_arc(&self) -> Arc<str> {
        self.uri.clone()
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn ptr(&self, node: NodeId) -> NodePtr {
        NodePtr::new(self.id, node)
    }

    pub fn node(&self, id: NodeId) -> Option<&AstNode> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut AstNode> {
        self.nodes.get_mut(id.index())
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(|n| n.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    /// Children of `id` with the given kind, in declaration order.
    pub fn children_of_kind(&self, id: NodeId, kind: NodeKind) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&c| self.kind(c) == Some(kind))
    }

    /// Containers of `id`, innermost first, ending at the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            document: self,
            next: self.parent(id),
        }
    }

    /// Nearest ancestor (excluding `id`) of the given kind.
    pub fn ancestor_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.ancestors(id).find(|&a| self.kind(a) == Some(kind))
    }

    /// `id` and everything below it, pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.node(id).is_none() {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Every node of the document, pre-order from the root.
    pub fn walk(&self) -> Vec<NodeId> {
        self.descendants(NodeId::ROOT)
    }

    /// Whether `id` was synthesized during export rather than parsed.
    pub fn is_derived(&self, id: NodeId) -> bool {
        id.index() >= self.parsed_len
    }

    /// Append `node` under `parent` and return its index.
    pub(crate) fn push_node(&mut self, parent: NodeId, mut node: AstNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        node.parent = Some(parent);
        self.nodes.push(node);
        if let Some(p) = self.nodes.get_mut(parent.index()) {
            p.children.push(id);
        }
        id
    }

    /// Drop every derived node and every child link pointing to one.
    pub(crate) fn clear_derived(&mut self) {
        let parsed_len = self.parsed_len;
        self.nodes.truncate(parsed_len);
        for node in &mut self.nodes {
            node.children.retain(|c| c.index() < parsed_len);
        }
    }

    /// Treat the current arena as the parsed content.
    pub(crate) fn seal(&mut self) {
        self.parsed_len = self.nodes.len();
    }

    /// Forget every cached reference resolution.
    pub(crate) fn reset_references(&mut self) {
        for node in &mut self.nodes {
            for (_, reference) in &mut node.references {
                reference.reset();
            }
        }
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut AstNode> {
        self.nodes.iter_mut()
    }
}

/// Iterator over the containers of a node.
pub struct Ancestors<'a> {
    document: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.document.parent(current);
        Some(current)
    }
}

/// Builds a [`Document`] tree node by node.
///
/// Parsing is owned by the caller; this is how parsed trees (and test
/// fixtures) enter the engine.
#[derive(Debug)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    pub fn new(uri: impl Into<Arc<str>>) -> Self {
        Self {
            document: Document {
                id: DocumentId::new(u32::MAX),
                uri: uri.into(),
                nodes: vec![AstNode::new(NodeKind::Root)],
                parsed_len: 1,
            },
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Add `node` as the last child of `parent`.
    pub fn add(&mut self, parent: NodeId, node: AstNode) -> NodeId {
        debug_assert!(parent.index() < self.document.nodes.len(), "unknown parent");
        self.document.push_node(parent, node)
    }

    pub fn build(mut self) -> Document {
        self.document.seal();
        self.document
    }
}
