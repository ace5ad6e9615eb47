mod common;

use csrf_oracle::classify::{classify_query, has_singleton_operation, ProtectionPolicy};
use csrf_oracle::errors::OracleError;
use csrf_oracle::graph::{EventGraphStore, MemoryGraph};
use csrf_oracle::models::{AbstractParseTree, QueryPattern, Scope, Variable, SESSION_UNIQUE, USER_GENERATED};

fn s1() -> Scope {
    Scope::new("shop", "s1", "alice")
}

#[test]
fn test_singleton_and_repeated_queries() {
    let g = common::shop_graph();
    assert_eq!(classify_query(&g, "apt-insert", &s1()).unwrap(), QueryPattern::Singleton);
    assert_eq!(classify_query(&g, "apt-select", &s1()).unwrap(), QueryPattern::Repeated);
}

#[test]
fn test_no_occurrence_in_scope_is_integrity_error() {
    let g = common::shop_graph();
    let scope = Scope::new("shop", "s9", "alice");
    assert!(matches!(classify_query(&g, "apt-insert", &scope), Err(OracleError::Integrity(_))));
}

#[test]
fn test_duplicate_abstraction_records_are_integrity_error() {
    let mut snapshot = common::shop_snapshot();
    snapshot.abstract_parse_trees.push(AbstractParseTree {
        uuid: "apt-insert".into(),
        message: "dup".into(),
        abstracts: vec!["pt-q1".into()],
    });
    let g = MemoryGraph::from_snapshot(snapshot).unwrap();
    assert!(matches!(classify_query(&g, "apt-insert", &s1()), Err(OracleError::Integrity(_))));
}

#[test]
fn test_singleton_operation_of_requests() {
    let g = common::shop_graph();
    assert!(has_singleton_operation(&g, "r1", &s1()).unwrap());
    assert!(has_singleton_operation(&g, "r6", &s1()).unwrap());
    assert!(!has_singleton_operation(&g, "r5", &s1()).unwrap());
}

#[test]
fn test_protection_of_captured_requests() {
    let g = common::shop_graph();
    let policy = ProtectionPolicy::standard().unwrap();
    assert!(policy.is_protected(g.variables_for_event("r1")));
    assert!(!policy.is_protected(g.variables_for_event("r6")));
}

#[test]
fn test_user_generated_token_does_not_protect() {
    let policy = ProtectionPolicy::standard().unwrap();
    let echoed = Variable {
        uuid: "v".into(),
        name: "csrf".into(),
        value: "x".into(),
        event: "e".into(),
        node: "n".into(),
        semtype: vec![SESSION_UNIQUE.into()],
        proptype: Some(vec![USER_GENERATED.into()]),
    };
    assert!(!policy.is_protected([&echoed]));
}

#[test]
fn test_custom_denylist() {
    let policy = ProtectionPolicy::new(&["csrf"]).unwrap();
    let g = common::shop_graph();
    // The cookie pair is no longer denylisted, the token is.
    assert!(policy.is_protected(g.variables_for_event("r6")));
    assert!(policy.is_denylisted("csrf_token"));
    assert!(!policy.is_denylisted("x-csrf"));
}
