//! Document storage shared by the build pipeline and scope resolution.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::base::DocumentId;
use crate::syntax::Document;

/// Read access to the documents of a workspace.
pub trait DocumentStore: Sync {
    fn document(&self, id: DocumentId) -> Option<&Document>;

    fn document_by_uri(&self, uri: &str) -> Option<&Document>;
}

/// All documents of a workspace, keyed by id and URI.
#[derive(Clone, Debug, Default)]
pub struct Workspace {
    documents: IndexMap<DocumentId, Document>,
    by_uri: FxHashMap<Arc<str>, DocumentId>,
    next_id: u32,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `document`, replacing any document with the same URI.
    ///
    /// A replaced document keeps its id.
    pub fn insert(&mut self, mut document: Document) -> DocumentId {
        let id = match self.by_uri.get(document.uri()) {
            Some(&existing) => existing,
            None => {
                let id = DocumentId::new(self.next_id);
                self.next_id += 1;
                self.by_uri.insert(document.uri_arc(), id);
                id
            }
        };
        document.set_id(id);
        self.documents.insert(id, document);
        id
    }

    pub fn remove(&mut self, uri: &str) -> Option<Document> {
        let id = self.by_uri.remove(uri)?;
        self.documents.shift_remove(&id)
    }

    pub fn id_of(&self, uri: &str) -> Option<DocumentId> {
        self.by_uri.get(uri).copied()
    }

    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    pub fn get_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.get_mut(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.documents.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Document> {
        self.documents.values_mut()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentStore for Workspace {
    fn document(&self, id: DocumentId) -> Option<&Document> {
        self.get(id)
    }

    fn document_by_uri(&self, uri: &str) -> Option<&Document> {
        self.id_of(uri).and_then(|id| self.get(id))
    }
}

/// A store that answers for one replaced document and defers the rest.
///
/// Used to resolve against an in-memory copy of a document extended with
/// synthetic nodes, without touching the workspace.
pub(crate) struct Overlay<'a> {
    base: &'a dyn DocumentStore,
    document: Document,
}

impl<'a> Overlay<'a> {
    pub(crate) fn new(base: &'a dyn DocumentStore, document: Document) -> Self {
        Self { base, document }
    }

    pub(crate) fn materialized(&self) -> &Document {
        &self.document
    }
}

impl DocumentStore for Overlay<'_> {
    fn document(&self, id: DocumentId) -> Option<&Document> {
        if id == self.document.id() {
            Some(&self.document)
        } else {
            self.base.document(id)
        }
    }

    fn document_by_uri(&self, uri: &str) -> Option<&Document> {
        if uri == self.document.uri() {
            Some(&self.document)
        } else {
            self.base.document_by_uri(uri)
        }
    }
}
