//! Symbol export: what a document makes visible to the rest of the workspace.

use tracing::trace;

use super::types::{Description, DescriptionKind};
use crate::base::NodeId;
use crate::hir::identity::IdentityProvider;
use crate::syntax::Document;

/// Export the symbols of `document`.
///
/// Drops derived attributes left over from a previous build, caches the
/// Global ID on every identified node, and returns one Local and one Global
/// description for every node that has both ids. These root-level
/// descriptions are the only symbols visible from other documents.
pub fn export_symbols(document: &mut Document, identity: &IdentityProvider<'_>) -> Vec<Description> {
    document.clear_derived();
    cache_global_ids(document, identity);

    let data_model = identity.data_model_of(document);
    let uri = document.uri_arc();
    let mut exports = Vec::new();
    for id in document.walk() {
        let Some(node) = document.node(id) else {
            continue;
        };
        let Some(global) = node.global_id() else {
            continue;
        };
        let Some(local) = identity.local_id(document, id) else {
            continue;
        };
        let ptr = document.ptr(id);
        exports.push(Description {
            name: local.into(),
            node_kind: node.kind,
            node: ptr,
            document_uri: uri.clone(),
            data_model: data_model.clone(),
            kind: DescriptionKind::Local,
        });
        exports.push(Description {
            name: global.into(),
            node_kind: node.kind,
            node: ptr,
            document_uri: uri.clone(),
            data_model: data_model.clone(),
            kind: DescriptionKind::Global,
        });
    }
    trace!(uri = %document.uri(), count = exports.len(), "exported symbols");
    exports
}

/// Compute and store the Global ID of every identified node.
pub(crate) fn cache_global_ids(document: &mut Document, identity: &IdentityProvider<'_>) {
    let computed: Vec<(NodeId, Option<String>)> = document
        .walk()
        .into_iter()
        .filter(|&id| document.kind(id).is_some_and(|k| k.is_identified()))
        .map(|id| (id, identity.global_id(document, id, None)))
        .collect();
    for (id, global) in computed {
        if let Some(node) = document.node_mut(id) {
            node.global_id = global.map(Into::into);
        }
    }
}
