//! AST nodes and lazily-resolved cross-references.

use std::sync::OnceLock;

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::kind::{NodeKind, Property};
use crate::base::{NodeId, NodePtr};

/// A cross-reference: the text written in the model plus the target it
/// resolves to.
///
/// The target is resolved on first lookup and cached until the workspace is
/// rebuilt, at which point [`Reference::reset`] drops it.
#[derive(Clone, Debug, Default)]
pub struct Reference {
    text: SmolStr,
    resolved: OnceLock<Option<NodePtr>>,
}

impl Reference {
    pub fn new(text: impl Into<SmolStr>) -> Self {
        Self {
            text: text.into(),
            resolved: OnceLock::new(),
        }
    }

    /// The reference text as written (`$refText`).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The cached resolution, if this reference has been looked up.
    ///
    /// `Some(None)` means a lookup happened and found nothing.
    pub fn cached(&self) -> Option<Option<NodePtr>> {
        self.resolved.get().copied()
    }

    /// Resolve with `resolve` on first call, return the cached target after.
    pub fn resolve_with(&self, resolve: impl FnOnce(&str) -> Option<NodePtr>) -> Option<NodePtr> {
        *self.resolved.get_or_init(|| resolve(&self.text))
    }

    /// Forget the cached target.
    pub fn reset(&mut self) {
        self.resolved.take();
    }
}

/// A node in a document tree.
///
/// Nodes are owned by their document's arena; `parent` and `children` are
/// arena indices. Cross-document relationships only go through
/// [`Reference`]s.
#[derive(Clone, Debug)]
pub struct AstNode {
    pub kind: NodeKind,
    pub id: Option<SmolStr>,
    pub name: Option<SmolStr>,
    pub description: Option<SmolStr>,
    /// Scalar properties such as `datatype`, `version` or `join`.
    pub properties: IndexMap<SmolStr, SmolStr>,
    /// Cross-references in declaration order; multi-valued properties repeat.
    pub references: Vec<(Property, Reference)>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) global_id: Option<SmolStr>,
    pub(crate) derived_from: Option<NodePtr>,
}

impl AstNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            id: None,
            name: None,
            description: None,
            properties: IndexMap::new(),
            references: Vec::new(),
            parent: None,
            children: Vec::new(),
            global_id: None,
            derived_from: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<SmolStr>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<SmolStr>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<SmolStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_reference(mut self, property: Property, text: impl Into<SmolStr>) -> Self {
        self.references.push((property, Reference::new(text)));
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Global ID cached during symbol export.
    pub fn global_id(&self) -> Option<&str> {
        self.global_id.as_deref()
    }

    /// Source attribute of a derived attribute.
    pub fn derived_from(&self) -> Option<NodePtr> {
        self.derived_from
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(SmolStr::as_str)
    }

    /// First reference stored under `property`.
    pub fn reference(&self, property: Property) -> Option<&Reference> {
        self.reference_at(property, 0)
    }

    /// The `index`-th reference stored under `property`.
    pub fn reference_at(&self, property: Property, index: usize) -> Option<&Reference> {
        self.references_of(property).nth(index)
    }

    pub fn references_of(&self, property: Property) -> impl Iterator<Item = &Reference> {
        self.references
            .iter()
            .filter(move |(p, _)| *p == property)
            .map(|(_, r)| r)
    }

    /// Clone the user-visible content of this node for a derived attribute.
    ///
    /// Structure, caches and references are not carried over.
    pub(crate) fn clone_as(&self, kind: NodeKind, source: NodePtr) -> AstNode {
        AstNode {
            kind,
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            properties: self.properties.clone(),
            references: Vec::new(),
            parent: None,
            children: Vec::new(),
            global_id: None,
            derived_from: Some(source),
        }
    }
}
