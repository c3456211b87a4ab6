//! Workspace index — exported descriptions of every document.
//!
//! The index is the single source of truth for cross-document lookup.
//! Per-kind global scopes are built lazily and cached; replacing or removing
//! a document drops the cached scope of every kind that document's old or
//! new exports could serve.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::trace;

use super::identity::find_next_id;
use super::symbols::{Description, DescriptionKind, LocalSymbols};
use crate::base::{DataModelId, DocumentId};
use crate::syntax::NodeKind;

/// Index of all exported descriptions plus each document's local tables.
#[derive(Debug, Default)]
pub struct WorkspaceIndex {
    /// Root-level exports per document, in insertion order.
    exports: IndexMap<DocumentId, Vec<Description>>,
    /// Container-scoped tables per document.
    locals: FxHashMap<DocumentId, LocalSymbols>,
    /// Lazily-built global scope per requested kind.
    by_kind: RwLock<FxHashMap<NodeKind, Arc<[Description]>>>,
}

impl WorkspaceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the exports of `document`.
    pub fn set_exports(&mut self, document: DocumentId, exports: Vec<Description>) {
        let old = self.exports.insert(document, exports);
        let mut kinds: Vec<NodeKind> = self.exports[&document].iter().map(|d| d.node_kind).collect();
        if let Some(old) = &old {
            kinds.extend(old.iter().map(|d| d.node_kind));
        }
        self.invalidate_kinds(&kinds);
    }

    /// Forget everything `document` contributed.
    pub fn remove_document(&mut self, document: DocumentId) {
        self.locals.remove(&document);
        if let Some(old) = self.exports.shift_remove(&document) {
            let kinds: Vec<NodeKind> = old.iter().map(|d| d.node_kind).collect();
            self.invalidate_kinds(&kinds);
        }
    }

    pub fn set_local_symbols(&mut self, document: DocumentId, symbols: LocalSymbols) {
        self.locals.insert(document, symbols);
    }

    pub fn local_symbols(&self, document: DocumentId) -> Option<&LocalSymbols> {
        self.locals.get(&document)
    }

    pub fn local_symbols_mut(&mut self, document: DocumentId) -> &mut LocalSymbols {
        self.locals.entry(document).or_default()
    }

    /// Root-level exports of `document`.
    pub fn exports_of(&self, document: DocumentId) -> &[Description] {
        self.exports
            .get(&document)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every exported description, document by document.
    pub fn all_descriptions(&self) -> impl Iterator<Item = &Description> {
        self.exports.values().flatten()
    }

    /// All Local and Global descriptions whose node kind can stand where
    /// `kind` is expected.
    pub fn global_scope(&self, kind: NodeKind) -> Arc<[Description]> {
        if let Some(cached) = self.by_kind.read().get(&kind) {
            return cached.clone();
        }
        let scope: Arc<[Description]> = self
            .all_descriptions()
            .filter(|d| d.node_kind.is_subtype_of(kind))
            .cloned()
            .collect();
        trace!(%kind, count = scope.len(), "built global scope");
        self.by_kind.write().insert(kind, scope.clone());
        scope
    }

    /// Drop every cached global scope.
    pub fn invalidate_all(&mut self) {
        self.by_kind.get_mut().clear();
    }

    fn invalidate_kinds(&mut self, kinds: &[NodeKind]) {
        self.by_kind
            .get_mut()
            .retain(|cached, _| !kinds.iter().any(|k| k.is_subtype_of(*cached)));
    }

    /// Number of exported descriptions.
    pub fn len(&self) -> usize {
        self.exports.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn document_count(&self) -> usize {
        self.exports.len()
    }

    /// First free Local ID for `kind` inside `data_model`.
    pub fn find_next_local_id(
        &self,
        kind: NodeKind,
        proposal: &str,
        data_model: Option<&DataModelId>,
    ) -> String {
        let existing = self
            .global_scope(kind)
            .iter()
            .filter(|d| d.kind == DescriptionKind::Local && d.data_model.as_ref() == data_model)
            .map(|d| d.name.clone())
            .collect::<Vec<_>>();
        find_next_id(proposal, existing)
    }

    /// First free Global ID for `kind` across the workspace.
    pub fn find_next_global_id(&self, kind: NodeKind, proposal: &str) -> String {
        let existing = self
            .global_scope(kind)
            .iter()
            .filter(|d| d.kind == DescriptionKind::Global)
            .map(|d| d.name.clone())
            .collect::<Vec<_>>();
        find_next_id(proposal, existing)
    }
}
