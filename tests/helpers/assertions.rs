//! Lookup and assertion helpers over an `Analysis` snapshot.

use crossmodel::NodePtr;
use crossmodel::hir::{Description, ReferenceSite};
use crossmodel::ide::Analysis;
use crossmodel::syntax::{NodeKind, Property};

/// The parsed node of `uri` whose Local ID is `local_id`.
pub fn node(analysis: &Analysis<'_>, uri: &str, local_id: &str) -> NodePtr {
    let document = analysis
        .document(uri)
        .unwrap_or_else(|| panic!("document '{uri}' should exist"));
    let identity = analysis.identity();
    document
        .walk()
        .into_iter()
        .filter(|&id| !document.is_derived(id))
        .find(|&id| identity.local_id(document, id).as_deref() == Some(local_id))
        .map(|id| document.ptr(id))
        .unwrap_or_else(|| panic!("no node '{local_id}' in '{uri}'"))
}

/// The first node of `kind` in `uri`, pre-order.
pub fn first_of_kind(analysis: &Analysis<'_>, uri: &str, kind: NodeKind) -> NodePtr {
    let document = analysis
        .document(uri)
        .unwrap_or_else(|| panic!("document '{uri}' should exist"));
    document
        .walk()
        .into_iter()
        .find(|&id| document.kind(id) == Some(kind))
        .map(|id| document.ptr(id))
        .unwrap_or_else(|| panic!("no {kind} in '{uri}'"))
}

/// Names visible from a site, innermost layer first.
pub fn scope_names(analysis: &Analysis<'_>, site: &ReferenceSite) -> Vec<String> {
    analysis
        .scope(site)
        .elements()
        .map(|d| d.name.to_string())
        .collect()
}

/// Resolve the reference stored at `(container, property)` and assert it
/// binds to `expected`.
pub fn assert_resolves_to(
    analysis: &Analysis<'_>,
    container: NodePtr,
    property: Property,
    expected: NodePtr,
) -> Description {
    let site = ReferenceSite::node(container, property);
    let found = analysis
        .resolve(&site)
        .unwrap_or_else(|| panic!("expected {property} of {container:?} to resolve"));
    assert_eq!(
        found.node, expected,
        "expected {property} to bind to {expected:?}, got '{}' ({:?})",
        found.name, found.node
    );
    found
}

/// Resolve `text` at a site and assert nothing is found.
pub fn assert_unresolved(analysis: &Analysis<'_>, site: &ReferenceSite, text: &str) {
    let scope = analysis.scope(site);
    assert!(
        scope.lookup(text).is_none(),
        "expected '{}' to be unresolved, found {:?}",
        text,
        scope.lookup(text)
    );
}
