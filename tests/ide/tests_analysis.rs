//! AnalysisHost: document lifecycle, linking and build modes.

use std::sync::Arc;

use crate::helpers::assertions::*;
use crate::helpers::fixtures::*;
use crossmodel::hir::ReferenceSite;
use crossmodel::ide::{AnalysisHost, LinkSummary};
use crossmodel::syntax::Property;

// ============================================================================
// DOCUMENT LIFECYCLE
// ============================================================================

#[test]
fn test_host_is_dirty_until_built() {
    let mut host = host_with(registry(), sales_documents());
    assert!(host.is_dirty());
    host.analysis();
    assert!(!host.is_dirty());

    assert!(host.touch_document(CUSTOMER));
    assert!(host.is_dirty());
}

#[test]
fn test_replacing_document_keeps_its_id() {
    let mut host = workspace_host();
    let before = host.workspace().id_of(CUSTOMER);
    let after = host.set_document(customer(&["Id"]));

    assert_eq!(before, Some(after));
    assert_eq!(host.workspace().len(), 10);
}

#[test]
fn test_remove_document_drops_its_symbols() {
    let mut host = workspace_host();
    host.analysis();

    let removed = host.remove_document(CUSTOMER);
    assert!(removed.is_some());
    assert!(host.is_dirty());
    assert!(host.remove_document(CUSTOMER).is_none());

    let analysis = host.analysis();
    assert!(analysis.document(CUSTOMER).is_none());
    assert!(analysis.exports(CUSTOMER).is_empty());
    let account = node(&analysis, ACCOUNT, "Account");
    assert!(analysis.resolve(&ReferenceSite::node(account, Property::SuperEntities)).is_none());
}

#[test]
fn test_exports_carry_both_id_forms() {
    let mut host = workspace_host();
    let analysis = host.analysis();

    let mut names: Vec<String> = analysis.exports(CUSTOMER).iter().map(|d| d.name.to_string()).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "Customer",
            "Customer.Email",
            "Customer.Id",
            "Customer.Name",
            "Sales.Customer",
            "Sales.Customer.Email",
            "Sales.Customer.Id",
            "Sales.Customer.Name",
        ]
    );
    assert!(analysis.exports("file:///ws/none.cm").is_empty());
}

// ============================================================================
// LINKING
// ============================================================================

#[test]
fn test_link_document_caches_targets() {
    let mut host = workspace_host();
    let analysis = host.analysis();
    let account = node(&analysis, ACCOUNT, "Account");
    let customer = node(&analysis, CUSTOMER, "Customer");

    let summary = analysis.link_document(ACCOUNT);
    assert_eq!(summary, LinkSummary { resolved: 1, unresolved: 0 });

    let reference = analysis
        .document(ACCOUNT)
        .and_then(|d| d.node(account.node))
        .and_then(|n| n.reference(Property::SuperEntities))
        .unwrap();
    assert_eq!(reference.cached(), Some(Some(customer)));
    assert_eq!(analysis.resolve_reference(account, Property::SuperEntities, 0), Some(customer));
}

#[test]
fn test_link_counts_expression_as_unresolved() {
    let mut host = workspace_host();
    let analysis = host.analysis();

    // Nine references; the expression binding never resolves through lookup.
    let summary = analysis.link_document(MAPPING);
    assert_eq!(summary, LinkSummary { resolved: 8, unresolved: 1 });
    assert_eq!(analysis.link_document("file:///ws/none.cm"), LinkSummary::default());
}

#[test]
fn test_rebuild_forgets_cached_targets() {
    let mut host = workspace_host();
    let account = {
        let analysis = host.analysis();
        analysis.link_document(ACCOUNT);
        node(&analysis, ACCOUNT, "Account")
    };

    host.touch_document(ACCOUNT);
    let analysis = host.analysis();
    let reference = analysis
        .document(ACCOUNT)
        .and_then(|d| d.node(account.node))
        .and_then(|n| n.reference(Property::SuperEntities))
        .unwrap();
    assert_eq!(reference.cached(), None);
}

#[test]
fn test_resolve_reference_out_of_range() {
    let mut host = workspace_host();
    let analysis = host.analysis();
    let account = node(&analysis, ACCOUNT, "Account");

    assert_eq!(analysis.resolve_reference(account, Property::SuperEntities, 1), None);
    assert_eq!(analysis.resolve_reference(account, Property::Entity, 0), None);
}

// ============================================================================
// BUILD MODES
// ============================================================================

#[test]
fn test_parallel_build_matches_sequential() {
    let mut sequential = workspace_host();
    let mut parallel = AnalysisHost::new(Arc::new(registry()));
    assert!(parallel.config().parallel);
    let mut documents = sales_documents();
    documents.extend(crm_documents());
    documents.extend(reporting_documents());
    for document in documents {
        parallel.set_document(document);
    }

    let a = sequential.analysis();
    let b = parallel.analysis();
    for uri in [CUSTOMER, DIAGRAM, ACCOUNT, MAPPING, REPORT] {
        let left: Vec<_> = a.exports(uri).iter().map(|d| d.name.clone()).collect();
        let right: Vec<_> = b.exports(uri).iter().map(|d| d.name.clone()).collect();
        assert_eq!(left, right, "exports of {uri}");
        assert_eq!(a.link_document(uri), b.link_document(uri), "links of {uri}");
    }
    for (uri, id) in [(DIAGRAM, "Overview.CustomerNode"), (MAPPING, "LoadAccount.ord")] {
        assert_eq!(
            a.derived_attributes(node(&a, uri, id)).len(),
            b.derived_attributes(node(&b, uri, id)).len(),
        );
    }
}
