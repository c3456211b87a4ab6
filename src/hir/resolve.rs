//! Scope resolution — which declarations a reference site can see.
//!
//! For a reference site (container node + property) the provider builds a
//! layered [`Scope`], first match wins:
//!
//! 1. container-local tables, walking from the site's container up to the
//!    document root (innermost first);
//! 2. the package scope: every description owned by the site's own data
//!    model, Local and Global forms alike;
//! 3. the dependency scope: Global descriptions of data models visible from
//!    the site's data model.
//!
//! Some reference kinds replace or narrow that general scope:
//!
//! - attribute mapping expression bindings resolve through expression
//!   substitution only, never through symbol lookup (empty scope);
//! - data model dependencies see the unfiltered global scope minus the
//!   declaring data model;
//! - relationship attribute sides only see attributes of the entity chosen
//!   on the same side of the relationship;
//! - a source object's entity can not be the mapping's target entity;
//! - source object dependencies only see the other source objects of the
//!   same mapping;
//! - join condition attributes only see the owning source object and the
//!   source objects it (transitively) depends on.
//!
//! Resolution never fails loudly: a malformed site degrades to the empty
//! scope and is logged.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::{debug, trace};
use uuid::Uuid;

use super::error::ScopeError;
use super::index::WorkspaceIndex;
use super::scope::Scope;
use super::symbols::{Description, DescriptionKind};
use super::workspace::{DocumentStore, Overlay};
use crate::base::constants::{ID_SEPARATOR, SYNTHETIC_MARKER, combine_ids};
use crate::base::{DataModelId, NodeId, NodePtr};
use crate::project::DataModelRegistry;
use crate::syntax::{AstNode, Document, DocumentBuilder, NodeKind, Property};

// ============================================================================
// REFERENCE SITES
// ============================================================================

/// Where a reference lives: its container, the reference property, and the
/// position within a multi-valued property.
#[derive(Clone, Debug)]
pub struct ReferenceSite {
    pub container: ReferenceContainer,
    pub property: Property,
    pub index: usize,
}

impl ReferenceSite {
    /// Site on an existing node.
    pub fn node(container: NodePtr, property: Property) -> Self {
        Self {
            container: ReferenceContainer::Node(container),
            property,
            index: 0,
        }
    }

    /// Site on a container that only exists on the editor side.
    pub fn synthetic(container: SyntheticContainer, property: Property) -> Self {
        Self {
            container: ReferenceContainer::Synthetic(container),
            property,
            index: 0,
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }
}

/// The container of a reference site.
#[derive(Clone, Debug)]
pub enum ReferenceContainer {
    /// A parsed node.
    Node(NodePtr),
    /// A not-yet-saved node described by its containment chain.
    Synthetic(SyntheticContainer),
}

/// A containment chain of nodes that do not exist in any document yet.
///
/// The chain hangs below `anchor` (a Global ID of an existing node in
/// `document_uri`) or below the document root; the last element is the
/// reference site's container. With `unsaved` set, a missing document is
/// treated as an empty new file instead of a malformed context.
#[derive(Clone, Debug, Default)]
pub struct SyntheticContainer {
    pub document_uri: String,
    pub anchor: Option<String>,
    pub elements: Vec<SyntheticElement>,
    pub unsaved: bool,
}

impl SyntheticContainer {
    pub fn new(document_uri: impl Into<String>) -> Self {
        Self {
            document_uri: document_uri.into(),
            ..Self::default()
        }
    }

    /// A chain in a file that has not been written yet, placed under
    /// `directory` so it belongs to the data model owning that directory.
    pub fn unsaved(directory: &str) -> Self {
        Self {
            document_uri: synthetic_uri(directory),
            unsaved: true,
            ..Self::default()
        }
    }

    pub fn with_anchor(mut self, global_id: impl Into<String>) -> Self {
        self.anchor = Some(global_id.into());
        self
    }

    pub fn with_element(mut self, element: SyntheticElement) -> Self {
        self.elements.push(element);
        self
    }
}

/// One synthetic node of a [`SyntheticContainer`] chain.
#[derive(Clone, Debug)]
pub struct SyntheticElement {
    pub kind: NodeKind,
    pub id: Option<SmolStr>,
    pub references: Vec<(Property, SmolStr)>,
}

impl SyntheticElement {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            id: None,
            references: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<SmolStr>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_reference(mut self, property: Property, text: impl Into<SmolStr>) -> Self {
        self.references.push((property, text.into()));
        self
    }

    fn to_node(&self) -> AstNode {
        let mut node = AstNode::new(self.kind);
        node.id = self.id.clone();
        for (property, text) in &self.references {
            node = node.with_reference(*property, text.clone());
        }
        node
    }
}

// ============================================================================
// SCOPE PROVIDER
// ============================================================================

/// Builds lookup scopes over a read-only workspace.
///
/// Cheap to construct; holds only borrows. Safe to share between threads as
/// long as no rebuild mutates the workspace or index it reads.
#[derive(Clone, Copy)]
pub struct ScopeProvider<'a> {
    documents: &'a dyn DocumentStore,
    index: &'a WorkspaceIndex,
    registry: &'a dyn DataModelRegistry,
}

impl<'a> ScopeProvider<'a> {
    pub fn new(
        documents: &'a dyn DocumentStore,
        index: &'a WorkspaceIndex,
        registry: &'a dyn DataModelRegistry,
    ) -> Self {
        Self {
            documents,
            index,
            registry,
        }
    }

    pub fn documents(&self) -> &'a dyn DocumentStore {
        self.documents
    }

    pub fn index(&self) -> &'a WorkspaceIndex {
        self.index
    }

    pub fn registry(&self) -> &'a dyn DataModelRegistry {
        self.registry
    }

    /// The scope for `site`; empty when the site is malformed.
    pub fn scope(&self, site: &ReferenceSite) -> Scope {
        match self.try_scope(site) {
            Ok(scope) => scope,
            Err(err) => {
                debug!(%err, property = %site.property, "scope resolution degraded to empty scope");
                Scope::empty()
            }
        }
    }

    /// Resolve the reference text stored at `site`.
    pub fn resolve(&self, site: &ReferenceSite) -> Option<Description> {
        match self.try_resolve(site) {
            Ok(found) => found,
            Err(err) => {
                debug!(%err, property = %site.property, "reference resolution degraded to unresolved");
                None
            }
        }
    }

    /// Resolve `text` as if it were written at `site`.
    pub fn resolve_text(&self, site: &ReferenceSite, text: &str) -> Option<Description> {
        self.scope(site).lookup(text).cloned()
    }

    pub fn try_scope(&self, site: &ReferenceSite) -> Result<Scope, ScopeError> {
        match &site.container {
            ReferenceContainer::Node(ptr) => self.scope_for_node(*ptr, site.property),
            ReferenceContainer::Synthetic(synthetic) => {
                let (overlay, container) = self.materialize(synthetic)?;
                let provider = ScopeProvider::new(&overlay, self.index, self.registry);
                let ptr = overlay.materialized().ptr(container);
                provider.scope_for_node(ptr, site.property)
            }
        }
    }

    pub fn try_resolve(&self, site: &ReferenceSite) -> Result<Option<Description>, ScopeError> {
        match &site.container {
            ReferenceContainer::Node(ptr) => {
                let (document, node) = self.container(*ptr)?;
                let Some(reference) = node.reference_at(site.property, site.index) else {
                    return Ok(None);
                };
                let scope = self.scope_for_node(*ptr, site.property)?;
                let text = reference.text();
                let found = scope.lookup(text).cloned();
                match &found {
                    Some(d) => trace!(uri = %document.uri(), text, target = %d.name, "resolved reference"),
                    None => trace!(uri = %document.uri(), text, "reference not found"),
                }
                Ok(found)
            }
            ReferenceContainer::Synthetic(synthetic) => {
                let (overlay, container) = self.materialize(synthetic)?;
                let provider = ScopeProvider::new(&overlay, self.index, self.registry);
                let ptr = overlay.materialized().ptr(container);
                provider.try_resolve(&ReferenceSite::node(ptr, site.property).with_index(site.index))
            }
        }
    }

    // ------------------------------------------------------------------------
    // Synthetic containers
    // ------------------------------------------------------------------------

    /// Copy the target document and append the synthetic chain to it.
    fn materialize(&self, synthetic: &SyntheticContainer) -> Result<(Overlay<'a>, NodeId), ScopeError> {
        let (mut document, anchor) = match self.documents.document_by_uri(&synthetic.document_uri) {
            Some(existing) => {
                let anchor = match &synthetic.anchor {
                    Some(global_id) => find_by_global_id(existing, global_id).ok_or_else(|| {
                        ScopeError::UnknownAnchor {
                            anchor: global_id.clone(),
                            uri: synthetic.document_uri.clone(),
                        }
                    })?,
                    None => existing.root(),
                };
                (existing.clone(), anchor)
            }
            None if synthetic.unsaved && synthetic.anchor.is_none() => {
                let document = DocumentBuilder::new(synthetic.document_uri.as_str()).build();
                let root = document.root();
                (document, root)
            }
            None => return Err(ScopeError::UnknownUri(synthetic.document_uri.clone())),
        };
        let mut parent = anchor;
        for element in &synthetic.elements {
            parent = document.push_node(parent, element.to_node());
        }
        debug!(
            uri = %synthetic.document_uri,
            synthetic = synthetic.elements.len(),
            "materialized synthetic container"
        );
        Ok((Overlay::new(self.documents, document), parent))
    }

    // ------------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------------

    fn container(&self, ptr: NodePtr) -> Result<(&'a Document, &'a AstNode), ScopeError> {
        let document = self
            .documents
            .document(ptr.document)
            .ok_or(ScopeError::UnknownDocument(ptr.document))?;
        let node = document.node(ptr.node).ok_or(ScopeError::UnknownNode {
            document: ptr.document,
            node: ptr.node,
        })?;
        Ok((document, node))
    }

    fn scope_for_node(&self, ptr: NodePtr, property: Property) -> Result<Scope, ScopeError> {
        let (document, node) = self.container(ptr)?;
        let target = node
            .kind
            .reference_target(property)
            .ok_or(ScopeError::InvalidProperty {
                kind: node.kind,
                property,
            })?;

        let scope = match (node.kind, property) {
            (NodeKind::AttributeMapping, Property::Expression) => Scope::empty(),
            (NodeKind::DataModelDependency, _) => self.data_model_dependency_scope(document, ptr.node),
            (NodeKind::SourceObjectDependency, _) => self.source_dependency_scope(document, ptr.node),
            (NodeKind::SourceObjectAttributeReference, _) => {
                self.join_attribute_scope(document, ptr.node)
            }
            (NodeKind::RelationshipAttribute, Property::Parent | Property::Child) => {
                self.relationship_attribute_scope(document, ptr.node, property, target)
            }
            (NodeKind::SourceObject, Property::Entity) => {
                self.source_entity_scope(document, ptr.node, target)
            }
            _ => self.general_scope(document, ptr.node, target),
        };
        Ok(scope)
    }

    // ------------------------------------------------------------------------
    // General case
    // ------------------------------------------------------------------------

    /// Container-local layers over the package scope over the dependency
    /// scope.
    fn general_scope(&self, document: &Document, container: NodeId, target: NodeKind) -> Scope {
        let mut layers: Vec<Vec<Description>> = Vec::new();
        if let Some(locals) = self.index.local_symbols(document.id()) {
            let chain = std::iter::once(container).chain(document.ancestors(container));
            for node in chain {
                let layer: Vec<Description> = locals
                    .get(node)
                    .iter()
                    .filter(|d| d.node_kind.is_subtype_of(target))
                    .cloned()
                    .collect();
                if !layer.is_empty() {
                    layers.push(layer);
                }
            }
        }
        let mut scope = self.global_scope(document, target);
        for layer in layers.into_iter().rev() {
            scope = Scope::with_outer(layer, scope);
        }
        scope
    }

    /// Package scope falling back to dependency scope.
    fn global_scope(&self, document: &Document, target: NodeKind) -> Scope {
        let source = self.registry.owning_data_model(document.uri());
        let all = self.index.global_scope(target);

        let package: Vec<Description> = all
            .iter()
            .filter(|d| d.data_model == source)
            .cloned()
            .collect();
        let dependency: Vec<Description> = match &source {
            Some(source) => all
                .iter()
                .filter(|d| d.kind == DescriptionKind::Global)
                .filter(|d| {
                    d.data_model
                        .as_ref()
                        .is_some_and(|dm| dm != source && self.registry.is_visible(source, dm, true))
                })
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        Scope::with_outer(package, Scope::new(dependency))
    }

    // ------------------------------------------------------------------------
    // Contextual scopes
    // ------------------------------------------------------------------------

    /// Every data model in the workspace except the declaring one.
    fn data_model_dependency_scope(&self, document: &Document, container: NodeId) -> Scope {
        let declaring_model = self.registry.owning_data_model(document.uri());
        let declaring_node = document
            .ancestor_of_kind(container, NodeKind::DataModel)
            .map(|id| document.ptr(id));
        let elements = self
            .index
            .global_scope(NodeKind::DataModel)
            .iter()
            .filter(|d| Some(d.node) != declaring_node)
            .filter(|d| declaring_model.is_none() || d.data_model != declaring_model)
            .cloned()
            .collect();
        Scope::new(elements)
    }

    /// Attributes of the entity chosen on the same side of the relationship.
    fn relationship_attribute_scope(
        &self,
        document: &Document,
        container: NodeId,
        property: Property,
        target: NodeKind,
    ) -> Scope {
        let Some(relationship) = document.ancestor_of_kind(container, NodeKind::Relationship) else {
            return Scope::empty();
        };
        let side = ReferenceSite::node(document.ptr(relationship), property);
        let Some(entity) = self.resolve(&side) else {
            debug!(?property, "relationship side unresolved, no attribute candidates");
            return Scope::empty();
        };
        let mut prefix = entity.name.to_string();
        prefix.push(ID_SEPARATOR);
        let owner = entity.node;
        self.general_scope(document, container, target).filter(&|d: &Description| {
            d.name.starts_with(&prefix)
                && d.node.document == owner.document
                && self
                    .documents
                    .document(owner.document)
                    .and_then(|doc| doc.parent(d.node.node))
                    == Some(owner.node)
        })
    }

    /// Entities, minus the entity already used by the mapping's target.
    fn source_entity_scope(&self, document: &Document, container: NodeId, target: NodeKind) -> Scope {
        let scope = self.general_scope(document, container, target);
        let target_entity = document
            .ancestor_of_kind(container, NodeKind::Mapping)
            .and_then(|mapping| document.children_of_kind(mapping, NodeKind::TargetObject).next())
            .and_then(|target_object| {
                self.resolve(&ReferenceSite::node(document.ptr(target_object), Property::Entity))
            })
            .map(|d| d.node);
        match target_entity {
            Some(excluded) => scope.filter(&|d: &Description| d.node != excluded),
            None => scope,
        }
    }

    /// The other source objects of the same mapping, by their Node ID.
    fn source_dependency_scope(&self, document: &Document, container: NodeId) -> Scope {
        let Some(owner) = document.ancestor_of_kind(container, NodeKind::SourceObject) else {
            return Scope::empty();
        };
        let Some(mapping) = document.parent(owner) else {
            return Scope::empty();
        };
        let data_model = self.registry.owning_data_model(document.uri());
        let elements = document
            .children_of_kind(mapping, NodeKind::SourceObject)
            .filter(|&source| source != owner)
            .filter_map(|source| {
                let id = node_id(document, source)?;
                Some(local_description(document, source, id, NodeKind::SourceObject, &data_model))
            })
            .collect();
        Scope::new(elements)
    }

    /// Derived attributes of the owning source object and of every source
    /// object it transitively depends on, as `sourceId.attributeId`.
    fn join_attribute_scope(&self, document: &Document, container: NodeId) -> Scope {
        let Some(owner) = document.ancestor_of_kind(container, NodeKind::SourceObject) else {
            return Scope::empty();
        };
        let data_model = self.registry.owning_data_model(document.uri());
        let mut elements = Vec::new();
        for source in source_dependency_closure(document, owner) {
            let Some(source_id) = node_id(document, source) else {
                continue;
            };
            for attribute in document.children_of_kind(source, NodeKind::SourceObjectAttribute) {
                let Some(attribute_id) = node_id(document, attribute) else {
                    continue;
                };
                elements.push(local_description(
                    document,
                    attribute,
                    combine_ids(&source_id, &attribute_id).into(),
                    NodeKind::SourceObjectAttribute,
                    &data_model,
                ));
            }
        }
        Scope::new(elements)
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn node_id(document: &Document, node: NodeId) -> Option<SmolStr> {
    document
        .node(node)?
        .id
        .as_ref()
        .filter(|id| !id.is_empty())
        .cloned()
}

fn local_description(
    document: &Document,
    node: NodeId,
    name: SmolStr,
    node_kind: NodeKind,
    data_model: &Option<DataModelId>,
) -> Description {
    Description {
        name,
        node_kind,
        node: document.ptr(node),
        document_uri: document.uri_arc(),
        data_model: data_model.clone(),
        kind: DescriptionKind::Local,
    }
}

/// `owner` followed by every sibling source object reachable through
/// declared source dependencies. Dependencies name siblings by Node ID.
fn source_dependency_closure(document: &Document, owner: NodeId) -> Vec<NodeId> {
    let Some(mapping) = document.parent(owner) else {
        return vec![owner];
    };
    let siblings: Vec<(SmolStr, NodeId)> = document
        .children_of_kind(mapping, NodeKind::SourceObject)
        .filter_map(|s| node_id(document, s).map(|id| (id, s)))
        .collect();

    let mut visited: FxHashSet<NodeId> = FxHashSet::default();
    let mut order = Vec::new();
    let mut stack = vec![owner];
    while let Some(source) = stack.pop() {
        if !visited.insert(source) {
            continue;
        }
        order.push(source);
        let declared: Vec<NodeId> = document
            .children_of_kind(source, NodeKind::SourceObjectDependency)
            .filter_map(|dep| document.node(dep)?.reference(Property::Source))
            .filter_map(|reference| {
                siblings
                    .iter()
                    .find(|(id, _)| id.as_str() == reference.text())
                    .map(|(_, node)| *node)
            })
            .collect();
        stack.extend(declared.into_iter().rev());
    }
    order
}

/// Find a node by its cached Global ID.
fn find_by_global_id(document: &Document, global_id: &str) -> Option<NodeId> {
    document
        .walk()
        .into_iter()
        .find(|&id| document.node(id).and_then(AstNode::global_id) == Some(global_id))
}

/// Fresh URI for a file that does not exist yet.
fn synthetic_uri(directory: &str) -> String {
    let directory = directory.trim_end_matches('/');
    format!("{directory}/{}.{SYNTHETIC_MARKER}.cm", Uuid::new_v4())
}
