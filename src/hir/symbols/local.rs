//! Container-scoped symbol tables.
//!
//! Every node with a Local ID is described in the table of its direct
//! container, so lookups walk the containment chain of the reference site.
//! These tables never leave their document.

use rustc_hash::FxHashMap;

use super::types::{Description, DescriptionKind};
use crate::base::NodeId;
use crate::hir::identity::IdentityProvider;
use crate::syntax::Document;

/// Per-container descriptions of one document.
#[derive(Clone, Debug, Default)]
pub struct LocalSymbols {
    by_container: FxHashMap<NodeId, Vec<Description>>,
}

impl LocalSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptions registered in `container`'s table.
    pub fn get(&self, container: NodeId) -> &[Description] {
        self.by_container
            .get(&container)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn add(&mut self, container: NodeId, description: Description) {
        self.by_container.entry(container).or_default().push(description);
    }

    /// Total number of descriptions across all containers.
    pub fn len(&self) -> usize {
        self.by_container.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_container.values().all(Vec::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Description)> {
        self.by_container
            .iter()
            .flat_map(|(&c, descs)| descs.iter().map(move |d| (c, d)))
    }
}

/// Build the container tables for the parsed nodes of `document`.
///
/// Expects Global IDs to be cached already (see `export_symbols`).
pub fn compute_local_symbols(document: &Document, identity: &IdentityProvider<'_>) -> LocalSymbols {
    let data_model = identity.data_model_of(document);
    let uri = document.uri_arc();
    let mut symbols = LocalSymbols::new();
    for id in document.walk() {
        if document.is_derived(id) {
            continue;
        }
        let (Some(node), Some(container)) = (document.node(id), document.parent(id)) else {
            continue;
        };
        let Some(local) = identity.local_id(document, id) else {
            continue;
        };
        let ptr = document.ptr(id);
        symbols.add(
            container,
            Description {
                name: local.into(),
                node_kind: node.kind,
                node: ptr,
                document_uri: uri.clone(),
                data_model: data_model.clone(),
                kind: DescriptionKind::Local,
            },
        );
        if let Some(global) = node.global_id() {
            symbols.add(
                container,
                Description {
                    name: global.into(),
                    node_kind: node.kind,
                    node: ptr,
                    document_uri: uri.clone(),
                    data_model: data_model.clone(),
                    kind: DescriptionKind::Global,
                },
            );
        }
    }
    symbols
}
