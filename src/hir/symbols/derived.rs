//! Derived attribute propagation.
//!
//! Diagram entity nodes, mapping source objects and mapping target objects
//! view a `LogicalEntity`. During a build each of them receives a clone of
//! the entity's attributes, so later phases never re-resolve the entity.
//! Clones are owned by the viewing node and only point back to their source
//! attribute; the whole set is replaced on the next build of the viewing
//! node's document.
//!
//! Propagation is split in two so a workspace build can plan every dirty
//! document in parallel against a read-only workspace and then apply each
//! plan with exactly one writer per document.

use tracing::{debug, trace};

use super::local::LocalSymbols;
use super::types::{Description, DescriptionKind};
use crate::base::constants::combine_ids;
use crate::base::{DocumentId, NodeId, NodePtr};
use crate::hir::identity::IdentityProvider;
use crate::hir::resolve::{ReferenceSite, ScopeProvider};
use crate::hir::workspace::DocumentStore;
use crate::syntax::{AstNode, Document, NodeKind, Property};

/// Clones to attach to one document's viewing nodes.
#[derive(Clone, Debug)]
pub struct DerivedAttributePlan {
    document: DocumentId,
    views: Vec<ViewPlan>,
}

#[derive(Clone, Debug)]
struct ViewPlan {
    viewing_node: NodeId,
    attributes: Vec<AstNode>,
}

impl DerivedAttributePlan {
    pub fn document(&self) -> DocumentId {
        self.document
    }

    /// Number of derived attributes the plan will create.
    pub fn attribute_count(&self) -> usize {
        self.views.iter().map(|v| v.attributes.len()).sum()
    }
}

/// Resolve every viewing node's entity and clone its attributes.
///
/// A dangling entity reference yields an empty attribute list.
pub fn plan_derived_attributes(
    document: &Document,
    provider: &ScopeProvider<'_>,
) -> DerivedAttributePlan {
    let mut views = Vec::new();
    for id in document.walk() {
        let Some(derived_kind) = document.kind(id).and_then(NodeKind::derived_attribute_kind) else {
            continue;
        };
        let site = ReferenceSite::node(document.ptr(id), Property::Entity);
        let attributes = match provider.resolve(&site) {
            Some(entity) => entity_attributes(provider.documents(), entity.node)
                .into_iter()
                .map(|(source, attribute)| attribute.clone_as(derived_kind, source))
                .collect(),
            None => {
                debug!(
                    uri = %document.uri(),
                    node = ?id,
                    "entity reference unresolved, no derived attributes"
                );
                Vec::new()
            }
        };
        views.push(ViewPlan {
            viewing_node: id,
            attributes,
        });
    }
    DerivedAttributePlan {
        document: document.id(),
        views,
    }
}

/// Attach planned clones to `document` and describe them in `symbols`.
///
/// Each clone is described as `viewingNodeId.attributeId` in the viewing
/// node's container. Target object clones are also described under their
/// bare attribute id in the target object itself.
pub fn apply_derived_attributes(
    document: &mut Document,
    plan: DerivedAttributePlan,
    identity: &IdentityProvider<'_>,
    symbols: &mut LocalSymbols,
) -> usize {
    debug_assert_eq!(plan.document, document.id(), "plan applied to another document");
    let data_model = identity.data_model_of(document);
    let uri = document.uri_arc();
    let document_id = document.id();
    let mut created = 0;
    for view in plan.views {
        let Some(view_kind) = document.kind(view.viewing_node) else {
            continue;
        };
        let view_id = identity.node_id(document, view.viewing_node);
        let container = document.parent(view.viewing_node);
        for attribute in view.attributes {
            let id = document.push_node(view.viewing_node, attribute);
            created += 1;
            let global = identity.global_id(document, id, None);
            let Some(node) = document.node_mut(id) else {
                continue;
            };
            node.global_id = global.map(Into::into);
            let node_kind = node.kind;
            let Some(attribute_id) = identity.node_id(document, id) else {
                continue;
            };
            let describe = |name: String| Description {
                name: name.into(),
                node_kind,
                node: NodePtr::new(document_id, id),
                document_uri: uri.clone(),
                data_model: data_model.clone(),
                kind: DescriptionKind::Local,
            };
            if let (Some(view_id), Some(container)) = (&view_id, container) {
                symbols.add(container, describe(combine_ids(view_id, &attribute_id)));
            }
            if view_kind == NodeKind::TargetObject {
                symbols.add(view.viewing_node, describe(attribute_id.to_string()));
            }
        }
    }
    trace!(uri = %document.uri(), created, "applied derived attributes");
    created
}

/// Attributes of the entity at `entity`, with their workspace handles.
fn entity_attributes<'d>(
    documents: &'d dyn DocumentStore,
    entity: NodePtr,
) -> Vec<(NodePtr, &'d AstNode)> {
    let Some(document) = documents.document(entity.document) else {
        return Vec::new();
    };
    if document.kind(entity.node) != Some(NodeKind::LogicalEntity) {
        return Vec::new();
    }
    document
        .children_of_kind(entity.node, NodeKind::LogicalAttribute)
        .filter_map(|id| document.node(id).map(|node| (document.ptr(id), node)))
        .collect()
}
