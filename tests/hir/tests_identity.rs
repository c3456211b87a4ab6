//! Identity tests: Local/Global/Reference IDs and unique id generation.

use rstest::rstest;

use crate::helpers::assertions::node;
use crate::helpers::fixtures::*;
use crossmodel::hir::ReferenceSite;
use crossmodel::ide::IdScope;
use crossmodel::syntax::{NodeKind, Property};

// ============================================================================
// LOCAL AND GLOBAL IDS
// ============================================================================

#[rstest]
#[case(CUSTOMER, "Customer", "Sales.Customer")]
#[case(CUSTOMER, "Customer.Name", "Sales.Customer.Name")]
#[case(DIAGRAM, "Overview.CustomerNode", "Sales.Overview.CustomerNode")]
#[case(MAPPING, "LoadAccount.cust", "CRM.LoadAccount.cust")]
#[case(ACCOUNT, "Account.Label", "CRM.Account.Label")]
fn test_global_id_is_reference_name_plus_local_id(
    #[case] uri: &str,
    #[case] local_id: &str,
    #[case] global_id: &str,
) {
    let mut host = workspace_host();
    let analysis = host.analysis();
    let ptr = node(&analysis, uri, local_id);

    assert_eq!(analysis.local_id(ptr).as_deref(), Some(local_id));
    assert_eq!(analysis.global_id(ptr).as_deref(), Some(global_id));
}

#[rstest]
#[case(SALES_MODEL, "sales", "Sales")]
#[case(CRM_MODEL, "crm", "CRM")]
fn test_data_model_global_id_is_reference_name(
    #[case] uri: &str,
    #[case] local_id: &str,
    #[case] reference_name: &str,
) {
    let mut host = workspace_host();
    let analysis = host.analysis();
    let ptr = node(&analysis, uri, local_id);

    assert_eq!(analysis.global_id(ptr).as_deref(), Some(reference_name));
}

#[test]
fn test_empty_id_is_not_nameable() {
    let mut documents = sales_documents();
    documents.push(entity("file:///ws/sales/blank.entity.cm", "", &[], None));
    let mut host = host_with(registry(), documents);
    let analysis = host.analysis();

    assert!(analysis.exports("file:///ws/sales/blank.entity.cm").is_empty());
}

#[test]
fn test_document_outside_data_models_has_no_global_id() {
    let mut documents = sales_documents();
    documents.push(entity("file:///elsewhere/loose.entity.cm", "Loose", &[], None));
    let mut host = host_with(registry(), documents);
    let analysis = host.analysis();
    let loose = node(&analysis, "file:///elsewhere/loose.entity.cm", "Loose");

    assert_eq!(analysis.global_id(loose), None);
    assert!(analysis.exports("file:///elsewhere/loose.entity.cm").is_empty());
}

// ============================================================================
// REFERENCE IDS
// ============================================================================

#[test]
fn test_reference_id_is_local_within_data_model() {
    let mut host = workspace_host();
    let analysis = host.analysis();
    let customer = node(&analysis, CUSTOMER, "Customer");
    let order = node(&analysis, ORDER, "Order");

    assert_eq!(analysis.reference_id(customer, order).as_deref(), Some("Customer"));
}

#[test]
fn test_reference_id_is_global_across_data_models() {
    let mut host = workspace_host();
    let analysis = host.analysis();
    let customer = node(&analysis, CUSTOMER, "Customer");
    let account = node(&analysis, ACCOUNT, "Account");

    assert_eq!(analysis.reference_id(customer, account).as_deref(), Some("Sales.Customer"));
}

#[test]
fn test_reference_id_requires_visibility() {
    let mut host = workspace_host();
    let analysis = host.analysis();
    let customer = node(&analysis, CUSTOMER, "Customer");
    let report = node(&analysis, REPORT, "Report");

    assert_eq!(analysis.reference_id(customer, report), None);
}

#[test]
fn test_reference_id_between_unowned_documents_is_none() {
    const FIRST: &str = "file:///elsewhere/a.entity.cm";
    const SECOND: &str = "file:///elsewhere/b.entity.cm";
    let mut documents = sales_documents();
    documents.push(entity(FIRST, "A", &["Id"], None));
    documents.push(entity(SECOND, "B", &[], Some("A")));
    let mut host = host_with(registry(), documents);
    let analysis = host.analysis();
    let a = node(&analysis, FIRST, "A");
    let b = node(&analysis, SECOND, "B");

    assert_eq!(analysis.reference_id(a, b), None);
    assert!(analysis.resolve(&ReferenceSite::node(b, Property::SuperEntities)).is_none());
    assert_eq!(analysis.reference_id(a, a).as_deref(), Some("A"));
}

// ============================================================================
// UNIQUE IDS
// ============================================================================

#[test]
fn test_next_local_id_skips_taken_suffixes() {
    let mut documents = sales_documents();
    documents.push(entity("file:///ws/sales/customer2.entity.cm", "Customer-2", &[], None));
    let mut host = host_with(registry(), documents);
    let analysis = host.analysis();

    let next = analysis.find_next_unique_id(NodeKind::LogicalEntity, "Customer", IdScope::Local(CUSTOMER));
    assert_eq!(next, "Customer-3");
}

#[test]
fn test_next_local_id_is_per_data_model() {
    let mut host = workspace_host();
    let analysis = host.analysis();

    let next = analysis.find_next_unique_id(NodeKind::LogicalEntity, "Customer", IdScope::Local(ACCOUNT));
    assert_eq!(next, "Customer");
}

#[rstest]
#[case("Name", "Name-2")]
#[case("Phone", "Phone")]
#[case("First Name", "First_Name")]
#[case("a.b", "a_b")]
fn test_next_internal_id(#[case] proposal: &str, #[case] expected: &str) {
    let mut host = workspace_host();
    let analysis = host.analysis();
    let customer = node(&analysis, CUSTOMER, "Customer");

    let next = analysis.find_next_unique_id(
        NodeKind::LogicalAttribute,
        proposal,
        IdScope::Internal(customer),
    );
    assert_eq!(next, expected);
}
