//! Completion candidates for reference sites.
//!
//! Candidates come from the same scope used for binding, then get
//! post-processed for presentation:
//!
//! 1. deduplicate by name (first, innermost occurrence wins);
//! 2. optionally drop the Global spelling of a node whose Local spelling is
//!    also offered;
//! 3. sort by qualification depth, then lexically, so shorter spellings come
//!    first.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::base::NodePtr;
use crate::base::constants::segment_count;
use crate::hir::{Description, DescriptionKind, Scope};
use crate::syntax::NodeKind;

/// Options for [`completion_candidates`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletionOptions {
    /// Hide `Sales.Customer` when `Customer` points at the same node.
    pub suppress_qualified_duplicates: bool,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            suppress_qualified_duplicates: true,
        }
    }
}

/// Kind of completion item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionKind {
    DataModel,
    Entity,
    Attribute,
    Relationship,
    DiagramNode,
    SourceObject,
}

impl CompletionKind {
    /// Convert to LSP completion item kind number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            CompletionKind::DataModel => 9,    // Module
            CompletionKind::Entity => 7,       // Class
            CompletionKind::Attribute => 5,    // Field
            CompletionKind::Relationship => 18, // Reference
            CompletionKind::DiagramNode => 6,  // Variable
            CompletionKind::SourceObject => 6, // Variable
        }
    }

    fn of(kind: NodeKind) -> Self {
        match kind {
            NodeKind::DataModel => CompletionKind::DataModel,
            NodeKind::LogicalEntity => CompletionKind::Entity,
            NodeKind::Relationship => CompletionKind::Relationship,
            NodeKind::LogicalEntityNode => CompletionKind::DiagramNode,
            NodeKind::SourceObject => CompletionKind::SourceObject,
            _ => CompletionKind::Attribute,
        }
    }
}

/// A completion suggestion.
#[derive(Clone, Debug)]
pub struct CompletionItem {
    /// The text to insert.
    pub label: Arc<str>,
    pub kind: CompletionKind,
    /// Detail text (shown after label).
    pub detail: Option<Arc<str>>,
    /// Documentation (shown in popup).
    pub documentation: Option<Arc<str>>,
    /// Sort priority (lower = higher priority).
    pub sort_priority: u32,
    /// The node the label binds to.
    pub target: NodePtr,
}

impl CompletionItem {
    /// Create from a description; `priority` is its rank in the sorted list.
    pub fn from_description(description: &Description, priority: u32) -> Self {
        let detail = match &description.data_model {
            Some(dm) => format!("{} ({dm})", description.node_kind),
            None => description.node_kind.to_string(),
        };
        Self {
            label: Arc::from(description.name.as_str()),
            kind: CompletionKind::of(description.node_kind),
            detail: Some(Arc::from(detail)),
            documentation: None,
            sort_priority: priority,
            target: description.node,
        }
    }

    /// Set the documentation.
    pub fn with_documentation(mut self, doc: impl Into<Arc<str>>) -> Self {
        self.documentation = Some(doc.into());
        self
    }
}

/// Post-process a scope into completion candidates.
pub fn completion_candidates(scope: &Scope, options: CompletionOptions) -> Vec<Description> {
    let mut names: FxHashSet<&str> = FxHashSet::default();
    let mut unique: Vec<&Description> = scope
        .elements()
        .filter(|d| names.insert(d.name.as_str()))
        .collect();

    if options.suppress_qualified_duplicates {
        let local_nodes: FxHashSet<NodePtr> = unique
            .iter()
            .filter(|d| d.kind == DescriptionKind::Local)
            .map(|d| d.node)
            .collect();
        unique.retain(|d| d.kind == DescriptionKind::Local || !local_nodes.contains(&d.node));
    }

    unique.sort_by(|a, b| {
        segment_count(&a.name)
            .cmp(&segment_count(&b.name))
            .then_with(|| a.name.cmp(&b.name))
    });
    unique.into_iter().cloned().collect()
}

/// Completion items for a scope, ranked.
pub fn completions(scope: &Scope, options: CompletionOptions) -> Vec<CompletionItem> {
    completion_candidates(scope, options)
        .iter()
        .enumerate()
        .map(|(rank, d)| CompletionItem::from_description(d, rank as u32))
        .collect()
}
