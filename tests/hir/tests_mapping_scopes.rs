//! Contextual scopes inside mappings.

use crate::helpers::assertions::*;
use crate::helpers::fixtures::*;
use crossmodel::hir::ReferenceSite;
use crossmodel::syntax::{NodeKind, Property};

#[test]
fn test_source_object_entity_excludes_target_entity() {
    let mut host = workspace_host();
    let analysis = host.analysis();
    let cust = node(&analysis, MAPPING, "LoadAccount.cust");
    let account = node(&analysis, ACCOUNT, "Account");
    let site = ReferenceSite::node(cust, Property::Entity);

    let scope = analysis.scope(&site);
    assert!(scope.elements().all(|d| d.node != account));
    assert!(scope.lookup("Sales.Customer").is_some());
    assert_unresolved(&analysis, &site, "Account");
}

#[test]
fn test_target_object_entity_resolves() {
    let mut host = workspace_host();
    let analysis = host.analysis();
    let target = first_of_kind(&analysis, MAPPING, NodeKind::TargetObject);
    let account = node(&analysis, ACCOUNT, "Account");

    assert_resolves_to(&analysis, target, Property::Entity, account);
}

#[test]
fn test_source_dependency_offers_other_sources_only() {
    let mut host = workspace_host();
    let analysis = host.analysis();
    let dependency = first_of_kind(&analysis, MAPPING, NodeKind::SourceObjectDependency);
    let cust = node(&analysis, MAPPING, "LoadAccount.cust");
    let site = ReferenceSite::node(dependency, Property::Source);

    let mut names = scope_names(&analysis, &site);
    names.sort();
    assert_eq!(names, vec!["cust", "other"]);
    assert_resolves_to(&analysis, dependency, Property::Source, cust);
}

#[test]
fn test_join_attributes_follow_dependency_closure() {
    let mut host = workspace_host();
    let analysis = host.analysis();
    let reference = first_of_kind(&analysis, MAPPING, NodeKind::SourceObjectAttributeReference);
    let site = ReferenceSite::node(reference, Property::Value);

    let mut names = scope_names(&analysis, &site);
    names.sort();
    assert_eq!(
        names,
        vec!["cust.Email", "cust.Id", "cust.Name", "ord.Id", "ord.Total"]
    );

    let found = analysis.resolve(&site).expect("join attribute should resolve");
    assert_eq!(found.node_kind, NodeKind::SourceObjectAttribute);
    let document = analysis.document(MAPPING).unwrap();
    assert!(document.is_derived(found.node.node));
}

#[test]
fn test_attribute_mapping_source_resolves_qualified_source_attribute() {
    let mut host = workspace_host();
    let analysis = host.analysis();
    let source = first_of_kind(&analysis, MAPPING, NodeKind::AttributeMappingSource);
    let site = ReferenceSite::node(source, Property::Value);

    let found = analysis.resolve(&site).expect("cust.Name should resolve");
    assert_eq!(found.name, "cust.Name");
    assert_eq!(found.node_kind, NodeKind::SourceObjectAttribute);
}

#[test]
fn test_attribute_mapping_target_resolves_bare_attribute() {
    let mut host = workspace_host();
    let analysis = host.analysis();
    let target = first_of_kind(&analysis, MAPPING, NodeKind::AttributeMappingTarget);
    let site = ReferenceSite::node(target, Property::Value);

    let found = analysis.resolve(&site).expect("Label should resolve");
    assert_eq!(found.name, "Label");
    assert_eq!(found.node_kind, NodeKind::TargetObjectAttribute);
}

#[test]
fn test_attribute_mapping_expression_scope_is_empty() {
    let mut host = workspace_host();
    let analysis = host.analysis();
    let mapping = first_of_kind(&analysis, MAPPING, NodeKind::AttributeMapping);
    let site = ReferenceSite::node(mapping, Property::Expression);

    assert!(analysis.scope(&site).is_empty());
    assert!(analysis.resolve(&site).is_none());
}
