//! Diagnostics — reference and identity errors.
//!
//! Unbindable references are reported here instead of failing resolution.
//! Duplicate exports are reported because two different nodes must never
//! claim the same name.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;

use super::index::WorkspaceIndex;
use super::resolve::{ReferenceSite, ScopeProvider};
use super::symbols::Description;
use crate::base::{DocumentId, NodeId};
use crate::syntax::{Document, NodeKind, Property};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// A diagnostic attached to a node (and optionally one of its references).
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub document: DocumentId,
    pub node: NodeId,
    /// The offending reference property, if any.
    pub property: Option<Property>,
    pub severity: Severity,
    /// Error/warning code (see [`codes`]).
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
    pub related: Vec<RelatedInfo>,
}

/// Another node involved in a diagnostic.
#[derive(Clone, Debug)]
pub struct RelatedInfo {
    pub document: DocumentId,
    pub node: NodeId,
    pub message: Arc<str>,
}

impl Diagnostic {
    pub fn error(document: DocumentId, node: NodeId, message: impl Into<Arc<str>>) -> Self {
        Self {
            document,
            node,
            property: None,
            severity: Severity::Error,
            code: None,
            message: message.into(),
            related: Vec::new(),
        }
    }

    pub fn warning(document: DocumentId, node: NodeId, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(document, node, message)
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.property = Some(property);
        self
    }

    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Diagnostic codes (E0001-E0099 are errors).
pub mod codes {
    /// Reference text matches no visible declaration.
    pub const UNRESOLVED_REFERENCE: &str = "E0001";
    /// Reference names a declaration of a data model that is not a dependency.
    pub const INVISIBLE_REFERENCE: &str = "E0002";
    /// Two different nodes export the same name.
    pub const DUPLICATE_ID: &str = "E0003";
}

// ============================================================================
// CHECKS
// ============================================================================

/// Report every reference in `document` that does not bind.
///
/// Attribute mapping expressions are skipped; they never bind through
/// symbol lookup.
pub fn check_references(document: &Document, provider: &ScopeProvider<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for id in document.walk() {
        if document.is_derived(id) {
            continue;
        }
        let Some(node) = document.node(id) else {
            continue;
        };
        let mut seen: FxHashMap<Property, usize> = FxHashMap::default();
        for (property, reference) in &node.references {
            let index = seen.entry(*property).or_default();
            let position = *index;
            *index += 1;
            if node.kind == NodeKind::AttributeMapping && *property == Property::Expression {
                continue;
            }
            let site = ReferenceSite::node(document.ptr(id), *property).with_index(position);
            if provider.resolve(&site).is_some() {
                continue;
            }
            diagnostics.push(unresolved(document, id, node.kind, *property, reference.text(), provider));
        }
    }
    trace!(uri = %document.uri(), count = diagnostics.len(), "checked references");
    diagnostics
}

fn unresolved(
    document: &Document,
    node: NodeId,
    kind: NodeKind,
    property: Property,
    text: &str,
    provider: &ScopeProvider<'_>,
) -> Diagnostic {
    let source = provider.registry().owning_data_model(document.uri());
    let hidden = kind.reference_target(property).and_then(|target| {
        provider
            .index()
            .global_scope(target)
            .iter()
            .find(|d| {
                d.is_global()
                    && d.name == text
                    && d.data_model.as_ref().is_some_and(|dm| match &source {
                        Some(source) => {
                            dm != source && !provider.registry().is_visible(source, dm, true)
                        }
                        None => true,
                    })
            })
            .cloned()
    });
    match hidden {
        Some(target) => {
            let owner = target
                .data_model
                .as_ref()
                .map(|dm| dm.to_string())
                .unwrap_or_default();
            Diagnostic::error(
                document.id(),
                node,
                format!("'{text}' is not visible here; add a dependency on data model '{owner}'"),
            )
            .with_property(property)
            .with_code(codes::INVISIBLE_REFERENCE)
            .with_related(RelatedInfo {
                document: target.node.document,
                node: target.node.node,
                message: "declared here".into(),
            })
        }
        None => Diagnostic::error(
            document.id(),
            node,
            format!("could not resolve {kind} {property} '{text}'"),
        )
        .with_property(property)
        .with_code(codes::UNRESOLVED_REFERENCE),
    }
}

/// Report names exported by more than one node within one data model.
pub fn check_duplicate_ids(index: &WorkspaceIndex, document: DocumentId) -> Vec<Diagnostic> {
    let mut first: FxHashMap<(&str, Option<&str>), &Description> = FxHashMap::default();
    for description in index.all_descriptions() {
        if description.is_global() {
            first
                .entry((description.name.as_str(), description.data_model.as_ref().map(|d| d.as_str())))
                .or_insert(description);
        }
    }
    index
        .exports_of(document)
        .iter()
        .filter(|d| d.is_global())
        .filter_map(|d| {
            let winner = first.get(&(d.name.as_str(), d.data_model.as_ref().map(|m| m.as_str())))?;
            (winner.node != d.node).then(|| {
                Diagnostic::error(d.node.document, d.node.node, format!("duplicate id '{}'", d.name))
                    .with_code(codes::DUPLICATE_ID)
                    .with_related(RelatedInfo {
                        document: winner.node.document,
                        node: winner.node.node,
                        message: "first declared here".into(),
                    })
            })
        })
        .collect()
}
