//! Reference and duplicate id diagnostics.

use crate::helpers::assertions::*;
use crate::helpers::fixtures::*;
use crossmodel::hir::{Severity, codes};
use crossmodel::syntax::{AstNode, DocumentBuilder, NodeKind, Property};

#[test]
fn test_clean_workspace_has_no_diagnostics() {
    let mut host = workspace_host();
    let analysis = host.analysis();

    for uri in [SALES_MODEL, CUSTOMER, ORDER, RELATIONSHIP, DIAGRAM, CRM_MODEL, ACCOUNT, MAPPING] {
        let diagnostics = analysis.diagnostics(uri);
        assert!(diagnostics.is_empty(), "{uri}: {diagnostics:?}");
    }
}

#[test]
fn test_reference_into_non_dependency_is_invisible() {
    let mut host = workspace_host();
    let analysis = host.analysis();
    let report = node(&analysis, REPORT, "Report");
    let customer = node(&analysis, CUSTOMER, "Customer");

    let diagnostics = analysis.diagnostics(REPORT);
    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.code.as_deref(), Some(codes::INVISIBLE_REFERENCE));
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.node, report.node);
    assert_eq!(diagnostic.property, Some(Property::SuperEntities));
    assert!(diagnostic.message.contains("'sales'"), "{}", diagnostic.message);
    assert_eq!(diagnostic.related.len(), 1);
    assert_eq!(diagnostic.related[0].document, customer.document);
    assert_eq!(diagnostic.related[0].node, customer.node);
}

#[test]
fn test_unknown_name_is_unresolved() {
    let mut documents = sales_documents();
    documents.push(entity("file:///ws/sales/vip.entity.cm", "Vip", &[], Some("Nobody")));
    let mut host = host_with(registry(), documents);
    let analysis = host.analysis();

    let diagnostics = analysis.diagnostics("file:///ws/sales/vip.entity.cm");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code.as_deref(), Some(codes::UNRESOLVED_REFERENCE));
    assert!(diagnostics[0].message.contains("'Nobody'"));
    assert!(diagnostics[0].related.is_empty());
}

#[test]
fn test_visible_but_excluded_target_is_unresolved_not_invisible() {
    // Sales is a dependency of CRM; the source object only fails because the
    // mapping's target already uses the same entity.
    const COPY: &str = "file:///ws/crm/copy_customer.mapping.cm";
    let mut b = DocumentBuilder::new(COPY);
    let mapping = b.add(b.root(), AstNode::new(NodeKind::Mapping).with_id("CopyCustomer"));
    b.add(
        mapping,
        AstNode::new(NodeKind::SourceObject)
            .with_id("c")
            .with_reference(Property::Entity, "Sales.Customer"),
    );
    b.add(
        mapping,
        AstNode::new(NodeKind::TargetObject).with_reference(Property::Entity, "Sales.Customer"),
    );
    let mut documents = sales_documents();
    documents.extend(crm_documents());
    documents.push(b.build());
    let mut host = host_with(registry(), documents);
    let analysis = host.analysis();
    let source = node(&analysis, COPY, "CopyCustomer.c");

    let diagnostics = analysis.diagnostics(COPY);
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    assert_eq!(diagnostics[0].code.as_deref(), Some(codes::UNRESOLVED_REFERENCE));
    assert_eq!(diagnostics[0].node, source.node);
    assert_eq!(diagnostics[0].property, Some(Property::Entity));
    assert!(diagnostics[0].related.is_empty());
}

#[test]
fn test_unowned_document_reports_data_model_symbol_as_invisible() {
    const LOOSE: &str = "file:///elsewhere/loose.entity.cm";
    let mut documents = sales_documents();
    documents.push(entity(LOOSE, "Loose", &[], Some("Sales.Customer")));
    let mut host = host_with(registry(), documents);
    let analysis = host.analysis();

    let diagnostics = analysis.diagnostics(LOOSE);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code.as_deref(), Some(codes::INVISIBLE_REFERENCE));
}

#[test]
fn test_duplicate_global_id_is_reported_once() {
    const SECOND_ORDER: &str = "file:///ws/sales/order_copy.entity.cm";
    let mut documents = sales_documents();
    documents.push(entity(SECOND_ORDER, "Order", &[], None));
    let mut host = host_with(registry(), documents);
    let analysis = host.analysis();
    let first = node(&analysis, ORDER, "Order");

    assert!(analysis.diagnostics(ORDER).is_empty());
    let duplicates: Vec<_> = analysis
        .diagnostics(SECOND_ORDER)
        .into_iter()
        .filter(|d| d.code.as_deref() == Some(codes::DUPLICATE_ID))
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert!(duplicates[0].message.contains("Sales.Order"));
    assert_eq!(duplicates[0].related[0].document, first.document);
}

#[test]
fn test_same_local_id_in_other_data_model_is_not_duplicate() {
    let mut documents = sales_documents();
    documents.extend(crm_documents());
    documents.push(entity(CRM_CUSTOMER, "Customer", &["Id"], None));
    let mut host = host_with(registry(), documents);
    let analysis = host.analysis();

    assert!(analysis.diagnostics(CRM_CUSTOMER).is_empty());
}

#[test]
fn test_expression_bindings_are_not_reported() {
    let mut host = workspace_host();
    let analysis = host.analysis();

    assert!(
        analysis
            .diagnostics(MAPPING)
            .iter()
            .all(|d| d.property != Some(Property::Expression))
    );
}
