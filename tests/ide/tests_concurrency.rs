//! Many readers against one snapshot.

use std::thread;

use once_cell::sync::OnceCell;

use crate::helpers::assertions::*;
use crate::helpers::fixtures::*;
use crossmodel::NodePtr;
use crossmodel::hir::ReferenceSite;
use crossmodel::ide::{Analysis, CompletionOptions, LinkSummary};
use crossmodel::syntax::Property;

const THREADS: usize = 8;
const ROUNDS: usize = 25;

const SITES: &[(&str, &str, Property)] = &[
    (ACCOUNT, "Account", Property::SuperEntities),
    (ORDER, "Order", Property::SuperEntities),
    (REPORT, "Report", Property::SuperEntities),
    (RELATIONSHIP, "OrderCustomer", Property::Parent),
    (RELATIONSHIP, "OrderCustomer", Property::Child),
    (DIAGRAM, "Overview.CustomerNode", Property::Entity),
    (MAPPING, "LoadAccount.cust", Property::Entity),
    (MAPPING, "LoadAccount.ord", Property::Entity),
];

fn resolve_all(analysis: &Analysis<'_>) -> Vec<Option<NodePtr>> {
    SITES
        .iter()
        .map(|&(uri, id, property)| {
            let site = ReferenceSite::node(node(analysis, uri, id), property);
            analysis.resolve(&site).map(|d| d.node)
        })
        .collect()
}

#[test]
fn test_concurrent_resolution_matches_sequential() {
    let mut host = workspace_host();
    let analysis = host.analysis();
    let expected = resolve_all(&analysis);
    assert!(expected[0].is_some());
    assert!(expected[2].is_none());

    thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(move || {
                    (0..ROUNDS)
                        .map(|_| resolve_all(&analysis))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            for round in handle.join().unwrap() {
                assert_eq!(round, expected);
            }
        }
    });
}

#[test]
fn test_concurrent_linking_caches_one_answer() {
    let mut host = workspace_host();
    let analysis = host.analysis();
    let account = node(&analysis, ACCOUNT, "Account");
    let customer = node(&analysis, CUSTOMER, "Customer");

    let first: OnceCell<LinkSummary> = OnceCell::new();

    thread::scope(|s| {
        for _ in 0..THREADS {
            let first = &first;
            s.spawn(move || {
                for uri in [ACCOUNT, RELATIONSHIP, DIAGRAM] {
                    analysis.link_document(uri);
                }
                let summary = analysis.link_document(MAPPING);
                assert_eq!(*first.get_or_init(|| summary), summary);
                assert_eq!(
                    analysis.resolve_reference(account, Property::SuperEntities, 0),
                    Some(customer)
                );
            });
        }
    });

    assert_eq!(first.get().map(|s| s.resolved), Some(8));
    assert_eq!(analysis.link_document(MAPPING), first.get().copied().unwrap_or_default());
}

#[test]
fn test_concurrent_completion_is_stable() {
    let mut host = workspace_host();
    let analysis = host.analysis();
    let account = node(&analysis, ACCOUNT, "Account");
    let site = ReferenceSite::node(account, Property::SuperEntities);
    let expected: Vec<String> = analysis
        .completion_candidates(&site, CompletionOptions::default())
        .iter()
        .map(|d| d.name.to_string())
        .collect();

    thread::scope(|s| {
        for _ in 0..THREADS {
            let site = site.clone();
            let expected = &expected;
            s.spawn(move || {
                for _ in 0..ROUNDS {
                    let got: Vec<String> = analysis
                        .completion_candidates(&site, CompletionOptions::default())
                        .iter()
                        .map(|d| d.name.to_string())
                        .collect();
                    assert_eq!(&got, expected);
                }
            });
        }
    });
}
