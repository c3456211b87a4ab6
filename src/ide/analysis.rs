//! AnalysisHost and Analysis — build pipeline and read-only snapshots.
//!
//! The `AnalysisHost` owns all mutable state (documents, registry, index)
//! and hands out `Analysis` snapshots for querying. A snapshot is `Sync`:
//! any number of threads may resolve and complete against it at once, and
//! the borrow checker keeps a rebuild from running while one is alive.
//!
//! ## Usage
//!
//! ```ignore
//! let mut host = AnalysisHost::new(Arc::new(registry));
//!
//! host.set_document(document);
//!
//! let analysis = host.analysis();
//! let target = analysis.resolve(&ReferenceSite::node(ptr, Property::Entity));
//! let diagnostics = analysis.diagnostics("file:///sales/customer.entity.cm");
//! ```

use std::sync::Arc;

use indexmap::IndexSet;
use rayon::prelude::*;
use tracing::{debug, info_span, trace};

use super::completion::{CompletionItem, CompletionOptions, completion_candidates, completions};
use crate::base::{DocumentId, NodePtr};
use crate::hir::{
    Description, DerivedAttributePlan, Diagnostic, DocumentStore, IdentityProvider, LocalSymbols,
    ReferenceSite, Scope, ScopeProvider, Workspace, WorkspaceIndex, apply_derived_attributes,
    check_duplicate_ids, check_references, compute_local_symbols, export_symbols, find_next_id,
    plan_derived_attributes,
};
use crate::project::DataModelRegistry;
use crate::syntax::{Document, NodeKind, Property};

/// Build settings for an [`AnalysisHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostConfig {
    /// Export and plan derived attributes on the rayon pool.
    pub parallel: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Where [`Analysis::find_next_unique_id`] looks for ids already in use.
#[derive(Clone, Copy, Debug)]
pub enum IdScope<'s> {
    /// Node IDs in the subtree of a container.
    Internal(NodePtr),
    /// Local IDs in the data model owning a document.
    Local(&'s str),
    /// Global IDs across the workspace.
    Global,
}

/// Outcome of [`Analysis::link_document`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkSummary {
    pub resolved: usize,
    pub unresolved: usize,
}

/// Owns all mutable state for resolution.
///
/// Apply changes via `set_document()`, `remove_document()` and
/// `touch_document()`, then get a consistent snapshot via `analysis()`.
pub struct AnalysisHost {
    registry: Arc<dyn DataModelRegistry>,
    workspace: Workspace,
    index: WorkspaceIndex,
    /// Documents whose exports and derived attributes must be rebuilt.
    dirty: IndexSet<DocumentId>,
    /// Set when a removal invalidated cached reference resolutions.
    references_stale: bool,
    config: HostConfig,
}

impl AnalysisHost {
    pub fn new(registry: Arc<dyn DataModelRegistry>) -> Self {
        Self::with_config(registry, HostConfig::default())
    }

    pub fn with_config(registry: Arc<dyn DataModelRegistry>, config: HostConfig) -> Self {
        Self {
            registry,
            workspace: Workspace::new(),
            index: WorkspaceIndex::new(),
            dirty: IndexSet::new(),
            references_stale: false,
            config,
        }
    }

    pub fn config(&self) -> HostConfig {
        self.config
    }

    /// Add or replace the document with the same URI.
    pub fn set_document(&mut self, document: Document) -> DocumentId {
        let id = self.workspace.insert(document);
        self.dirty.insert(id);
        id
    }

    /// Drop a document and everything it exported.
    pub fn remove_document(&mut self, uri: &str) -> Option<Document> {
        let document = self.workspace.remove(uri)?;
        self.dirty.shift_remove(&document.id());
        self.index.remove_document(document.id());
        self.references_stale = true;
        Some(document)
    }

    /// Mark a document for rebuild without changing its content.
    ///
    /// Needed to refresh derived attributes after an entity in another
    /// document changed.
    pub fn touch_document(&mut self, uri: &str) -> bool {
        match self.workspace.id_of(uri) {
            Some(id) => {
                self.dirty.insert(id);
                true
            }
            None => false,
        }
    }

    /// Replace the registry. Every document is rebuilt on the next snapshot.
    pub fn set_registry(&mut self, registry: Arc<dyn DataModelRegistry>) {
        self.registry = registry;
        self.index.invalidate_all();
        self.dirty.extend(self.workspace.ids());
    }

    pub fn registry(&self) -> &dyn DataModelRegistry {
        &*self.registry
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn index(&self) -> &WorkspaceIndex {
        &self.index
    }

    /// Whether the next `analysis()` call has work to do.
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty() || self.references_stale
    }

    /// Rebuild every dirty document.
    ///
    /// Called automatically by `analysis()`.
    pub fn rebuild(&mut self) {
        if !self.is_dirty() {
            return;
        }
        let dirty: Vec<DocumentId> = self.dirty.drain(..).collect();
        let _span = info_span!("rebuild", documents = dirty.len()).entered();
        let registry = &*self.registry;
        let identity = IdentityProvider::new(registry);

        // Exports and container tables; each document has exactly one writer.
        let mut targets: Vec<&mut Document> = self
            .workspace
            .iter_mut()
            .filter(|d| dirty.contains(&d.id()))
            .collect();
        let export = |document: &mut &mut Document| {
            let exports = export_symbols(document, &identity);
            let locals = compute_local_symbols(document, &identity);
            (document.id(), exports, locals)
        };
        let built: Vec<(DocumentId, Vec<Description>, LocalSymbols)> = if self.config.parallel {
            targets.par_iter_mut().map(export).collect()
        } else {
            targets.iter_mut().map(export).collect()
        };
        for (id, exports, locals) in built {
            self.index.set_exports(id, exports);
            self.index.set_local_symbols(id, locals);
        }
        debug!(documents = dirty.len(), symbols = self.index.len(), "exported symbols");

        // Derived attributes: plan against the read-only workspace, then apply.
        let plans: Vec<DerivedAttributePlan> = {
            let provider = ScopeProvider::new(&self.workspace, &self.index, registry);
            let plan = |id: &DocumentId| {
                self.workspace
                    .get(*id)
                    .map(|document| plan_derived_attributes(document, &provider))
            };
            if self.config.parallel {
                dirty.par_iter().filter_map(plan).collect()
            } else {
                dirty.iter().filter_map(plan).collect()
            }
        };
        let mut derived = 0;
        for plan in plans {
            let id = plan.document();
            let Some(document) = self.workspace.get_mut(id) else {
                continue;
            };
            derived += apply_derived_attributes(
                document,
                plan,
                &identity,
                self.index.local_symbols_mut(id),
            );
        }
        debug!(derived, "applied derived attributes");

        for document in self.workspace.iter_mut() {
            document.reset_references();
        }
        self.references_stale = false;
    }

    /// Get a consistent snapshot for querying.
    ///
    /// If any document is dirty, the workspace is rebuilt first.
    pub fn analysis(&mut self) -> Analysis<'_> {
        self.rebuild();
        Analysis {
            workspace: &self.workspace,
            index: &self.index,
            registry: &*self.registry,
        }
    }
}

/// A read-only snapshot of the workspace.
#[derive(Clone, Copy)]
pub struct Analysis<'a> {
    workspace: &'a Workspace,
    index: &'a WorkspaceIndex,
    registry: &'a dyn DataModelRegistry,
}

impl<'a> Analysis<'a> {
    pub fn document(&self, uri: &str) -> Option<&'a Document> {
        self.workspace.document_by_uri(uri)
    }

    pub fn workspace(&self) -> &'a Workspace {
        self.workspace
    }

    pub fn index(&self) -> &'a WorkspaceIndex {
        self.index
    }

    pub fn provider(&self) -> ScopeProvider<'a> {
        ScopeProvider::new(self.workspace, self.index, self.registry)
    }

    pub fn identity(&self) -> IdentityProvider<'a> {
        IdentityProvider::new(self.registry)
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    /// The scope for a reference site; empty when the site is malformed.
    pub fn scope(&self, site: &ReferenceSite) -> Scope {
        self.provider().scope(site)
    }

    /// The declaration the reference at `site` binds to.
    pub fn resolve(&self, site: &ReferenceSite) -> Option<Description> {
        self.provider().resolve(site)
    }

    /// Resolve the `index`-th `property` reference of `node` and cache the
    /// result on the reference itself.
    pub fn resolve_reference(
        &self,
        node: NodePtr,
        property: Property,
        index: usize,
    ) -> Option<NodePtr> {
        let document = self.workspace.get(node.document)?;
        let reference = document.node(node.node)?.reference_at(property, index)?;
        let provider = self.provider();
        reference.resolve_with(|_| {
            let site = ReferenceSite::node(node, property).with_index(index);
            provider.resolve(&site).map(|d| d.node)
        })
    }

    /// Resolve and cache every reference in a document.
    pub fn link_document(&self, uri: &str) -> LinkSummary {
        let mut summary = LinkSummary::default();
        let Some(document) = self.document(uri) else {
            return summary;
        };
        for id in document.walk() {
            let Some(node) = document.node(id) else {
                continue;
            };
            for property in distinct_properties(node.references.iter().map(|(p, _)| *p)) {
                for index in 0..node.references_of(property).count() {
                    match self.resolve_reference(document.ptr(id), property, index) {
                        Some(_) => summary.resolved += 1,
                        None => summary.unresolved += 1,
                    }
                }
            }
        }
        trace!(uri, resolved = summary.resolved, unresolved = summary.unresolved, "linked document");
        summary
    }

    // ------------------------------------------------------------------------
    // Completion
    // ------------------------------------------------------------------------

    pub fn completion_candidates(
        &self,
        site: &ReferenceSite,
        options: CompletionOptions,
    ) -> Vec<Description> {
        completion_candidates(&self.scope(site), options)
    }

    pub fn completions(&self, site: &ReferenceSite, options: CompletionOptions) -> Vec<CompletionItem> {
        completions(&self.scope(site), options)
    }

    // ------------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------------

    pub fn global_id(&self, node: NodePtr) -> Option<String> {
        let document = self.workspace.get(node.document)?;
        match document.node(node.node)?.global_id() {
            Some(cached) => Some(cached.to_string()),
            None => self.identity().global_id(document, node.node, None),
        }
    }

    pub fn local_id(&self, node: NodePtr) -> Option<String> {
        let document = self.workspace.get(node.document)?;
        self.identity().local_id(document, node.node)
    }

    /// Shortest id `source` can use to reference `target`.
    pub fn reference_id(&self, target: NodePtr, source: NodePtr) -> Option<String> {
        let target_doc = self.workspace.get(target.document)?;
        let source_doc = self.workspace.get(source.document)?;
        self.identity()
            .reference_id((target_doc, target.node), (source_doc, source.node), true)
    }

    /// First unused id derived from `proposal` within `scope`.
    pub fn find_next_unique_id(&self, kind: NodeKind, proposal: &str, scope: IdScope<'_>) -> String {
        match scope {
            IdScope::Internal(container) => match self.workspace.get(container.document) {
                Some(document) => {
                    self.identity()
                        .find_next_internal_id(kind, proposal, document, container.node)
                }
                None => find_next_id(proposal, std::iter::empty::<&str>()),
            },
            IdScope::Local(uri) => {
                let data_model = self.registry.owning_data_model(uri);
                self.index.find_next_local_id(kind, proposal, data_model.as_ref())
            }
            IdScope::Global => self.index.find_next_global_id(kind, proposal),
        }
    }

    // ------------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------------

    /// Unresolved references and duplicate ids in a document.
    pub fn diagnostics(&self, uri: &str) -> Vec<Diagnostic> {
        let Some(document) = self.document(uri) else {
            return Vec::new();
        };
        let mut diagnostics = check_references(document, &self.provider());
        diagnostics.extend(check_duplicate_ids(self.index, document.id()));
        diagnostics
    }

    /// What a document exports to the rest of the workspace.
    pub fn exports(&self, uri: &str) -> &'a [Description] {
        match self.workspace.id_of(uri) {
            Some(id) => self.index.exports_of(id),
            None => &[],
        }
    }

    /// Derived attributes currently attached to a viewing node.
    pub fn derived_attributes(&self, view: NodePtr) -> Vec<NodePtr> {
        let Some(document) = self.workspace.get(view.document) else {
            return Vec::new();
        };
        document
            .children(view.node)
            .iter()
            .filter(|&&c| document.is_derived(c))
            .map(|&c| document.ptr(c))
            .collect()
    }
}

fn distinct_properties(properties: impl Iterator<Item = Property>) -> Vec<Property> {
    let mut out: Vec<Property> = Vec::new();
    for property in properties {
        if !out.contains(&property) {
            out.push(property);
        }
    }
    out
}
