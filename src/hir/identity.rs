//! Identity provider: Node, Local, Global and Reference IDs.
//!
//! All lookups return `None` when an identity cannot be computed (missing
//! id, document outside any data model). `None` means "not nameable".
//!
//! Empty-string ids count as missing, so a node with `id: ""` is treated
//! exactly like a node without an id.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::base::constants::{ID_SEPARATOR, combine_ids, normalize_id};
use crate::base::{DataModelId, NodeId};
use crate::project::DataModelRegistry;
use crate::syntax::{Document, NodeKind};

/// Computes identities for nodes. Pure over the AST plus registry lookups.
#[derive(Clone, Copy)]
pub struct IdentityProvider<'a> {
    registry: &'a dyn DataModelRegistry,
}

impl<'a> IdentityProvider<'a> {
    pub fn new(registry: &'a dyn DataModelRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a dyn DataModelRegistry {
        self.registry
    }

    /// Data model owning `document`.
    pub fn data_model_of(&self, document: &Document) -> Option<DataModelId> {
        self.registry.owning_data_model(document.uri())
    }

    /// The node's own `id`.
    pub fn node_id(&self, document: &Document, node: NodeId) -> Option<SmolStr> {
        document
            .node(node)?
            .id
            .as_ref()
            .filter(|id| !id.is_empty())
            .cloned()
    }

    /// Node ID prefixed by the Node IDs of all identified ancestors,
    /// outermost first.
    pub fn local_id(&self, document: &Document, node: NodeId) -> Option<String> {
        let own = self.node_id(document, node)?;
        let mut segments: Vec<SmolStr> = document
            .ancestors(node)
            .filter_map(|ancestor| self.node_id(document, ancestor))
            .collect();
        segments.reverse();
        segments.push(own);
        let mut out = String::new();
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                out.push(ID_SEPARATOR);
            }
            out.push_str(segment);
        }
        Some(out)
    }

    /// Local ID prefixed with the owning data model's reference name.
    ///
    /// A data model node's Global ID is the reference name itself.
    pub fn global_id(
        &self,
        document: &Document,
        node: NodeId,
        reference_name_override: Option<&str>,
    ) -> Option<String> {
        let reference_name: SmolStr = match reference_name_override {
            Some(name) => name.into(),
            None => {
                let data_model = self.data_model_of(document)?;
                self.registry.reference_name(&data_model)?
            }
        };
        if document.kind(node)? == NodeKind::DataModel {
            return Some(reference_name.to_string());
        }
        let local = self.local_id(document, node)?;
        Some(combine_ids(&reference_name, &local))
    }

    /// Shortest id usable from `source` to address `target`.
    ///
    /// Local ID within one data model, Global ID across data models, `None`
    /// when the target's data model is not visible from the source's or when
    /// a document outside every data model points into another document.
    pub fn reference_id(
        &self,
        target: (&Document, NodeId),
        source: (&Document, NodeId),
        for_reference: bool,
    ) -> Option<String> {
        let (target_doc, target_node) = target;
        let (source_doc, _) = source;
        let target_model = self.data_model_of(target_doc);
        let source_model = self.data_model_of(source_doc);
        match (&source_model, &target_model) {
            (Some(from), Some(to)) => {
                if !self.registry.is_visible(from, to, for_reference) {
                    return None;
                }
                if from == to {
                    self.local_id(target_doc, target_node)
                } else {
                    self.global_id(target_doc, target_node, None)
                }
            }
            // Without a data model nothing is exported; only the document's
            // own container tables can bind the name.
            (None, None) if source_doc.id() == target_doc.id() => {
                self.local_id(target_doc, target_node)
            }
            _ => None,
        }
    }

    /// First free Node ID for `kind` within the subtree rooted at `container`.
    pub fn find_next_internal_id(
        &self,
        kind: NodeKind,
        proposal: &str,
        document: &Document,
        container: NodeId,
    ) -> String {
        let existing = document
            .descendants(container)
            .into_iter()
            .filter(|&n| document.kind(n).is_some_and(|k| k.is_subtype_of(kind)))
            .filter_map(|n| self.node_id(document, n));
        find_next_id(proposal, existing)
    }
}

/// Return the first of `proposal`, `proposal-2`, `proposal-3`, … that is not
/// in `existing`. The proposal is normalized first.
pub fn find_next_id<I, S>(proposal: &str, existing: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let base = normalize_id(proposal);
    let taken: FxHashSet<String> = existing
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect();
    if !taken.contains(&base) {
        return base;
    }
    let mut counter = 2usize;
    loop {
        let candidate = format!("{base}-{counter}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
