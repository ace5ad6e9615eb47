mod common;

use std::path::{Path, PathBuf};
use chrono::Utc;
use csrf_oracle::cli::oracle::run_oracle;
use csrf_oracle::cli::OracleArgs;
use csrf_oracle::db::Database;
use csrf_oracle::models::{ConcreteRequest, QueryPattern, TestCase, Verdict};
use csrf_oracle::oracle::{Evaluation, ExecutedQuery};
use indicatif::ProgressBar;
use tempfile::TempDir;

fn test_case(seq_id: i64, abstract_event: &str, operation: &str, session: &str) -> TestCase {
    TestCase {
        seq_id,
        batch_id: "batch-1".into(),
        created_at: Utc::now(),
        project: "shop".into(),
        session: session.into(),
        operation: operation.into(),
        user: "alice".into(),
        request_event_id: abstract_event.into(),
        mutated_node_id: Some("r1-csrf".into()),
        source_var_id: Some("v-csrf-1".into()),
        sink_var_id: None,
        request: ConcreteRequest {
            method: "POST".into(),
            url: "https://shop.local/pay".into(),
            ..Default::default()
        },
    }
}

/// A test case store and its replay store.
fn run_stores(dir: &Path, name: &str, cases: &[(TestCase, Vec<&str>)]) -> (PathBuf, PathBuf) {
    let tc_path = dir.join(format!("{}-tc.db", name));
    let replay_path = dir.join(format!("{}-replay.db", name));
    let tc_db = Database::new(&tc_path).unwrap();
    let replay_db = Database::new(&replay_path).unwrap();
    for (tc, queries) in cases {
        tc_db.insert_test_case(tc).unwrap();
        for q in queries {
            replay_db.insert_replay_query(tc.seq_id, q).unwrap();
        }
    }
    (tc_path, replay_path)
}

fn args(references: &[(PathBuf, PathBuf)], subject: (PathBuf, PathBuf), output: Option<PathBuf>) -> OracleArgs {
    let tc_references: Vec<String> = references.iter().map(|r| r.0.display().to_string()).collect();
    let replay_references: Vec<String> = references.iter().map(|r| r.1.display().to_string()).collect();
    OracleArgs {
        tc_references: tc_references.join(","),
        tc_analyzed_references: replay_references.join(","),
        tc: subject.0,
        tc_analyzed: subject.1,
        output,
        json: false,
    }
}

/// Reference run: the unmutated request without the state change under test.
fn baseline_run(dir: &Path) -> (PathBuf, PathBuf) {
    run_stores(dir, "ref", &[(test_case(1, "ae-pay", "pay", "s1"), vec![common::SELECT_BALANCE])])
}

#[test]
fn test_state_change_survives_mutation_is_vulnerable() {
    let dir = TempDir::new().unwrap();
    let reference = baseline_run(dir.path());
    let subject = run_stores(
        dir.path(),
        "subject",
        &[(
            test_case(1, "ae-pay", "pay", "s1"),
            vec!["'INSERT INTO payments (account, amount) VALUES (3, 25)'", common::SELECT_BALANCE],
        )],
    );
    let output = dir.path().join("results.db");

    let run = run_oracle(&common::shop_graph(), &args(&[reference], subject, Some(output.clone())), &ProgressBar::hidden())
        .unwrap();
    assert_eq!(run.vulnerable, 1);
    assert_eq!(run.not_vulnerable, 0);

    let Evaluation::Verdict(report) = &run.evaluations[0] else {
        panic!("expected a verdict");
    };
    assert_eq!(report.verdict, Verdict::Vulnerable);
    assert_eq!(report.modeled, 1);
    // Sorted by message for display.
    assert!(report.results[0].query_message.starts_with("INSERT"));
    let insert = &report.results[0];
    assert!(insert.observed && insert.unique);
    assert_eq!(insert.abstract_query_id.as_deref(), Some("apt-insert"));
    assert_eq!(insert.trace_pattern, Some(QueryPattern::Singleton));
    let select = &report.results[1];
    assert!(!select.observed);
    assert!(!select.unique);
    assert_eq!(select.trace_pattern_label(), "REPEATED");

    let stored = Database::open_existing(&output).unwrap().load_oracle_results().unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|(_, v)| *v == Verdict::Vulnerable));
}

#[test]
fn test_state_change_seen_in_baseline_is_not_vulnerable() {
    let dir = TempDir::new().unwrap();
    let reference = run_stores(
        dir.path(),
        "ref",
        &[(test_case(1, "ae-pay", "pay", "s1"), vec![common::INSERT_PAYMENT, common::SELECT_BALANCE])],
    );
    let subject = run_stores(
        dir.path(),
        "subject",
        &[(test_case(1, "ae-pay", "pay", "s1"), vec![common::INSERT_PAYMENT])],
    );
    let run = run_oracle(&common::shop_graph(), &args(&[reference], subject, None), &ProgressBar::hidden()).unwrap();
    assert_eq!(run.not_vulnerable, 1);
    assert_eq!(run.evaluations[0].verdict(), Some(Verdict::NotVulnerable));
}

#[test]
fn test_blocked_request_is_not_vulnerable() {
    let dir = TempDir::new().unwrap();
    let reference = baseline_run(dir.path());
    let subject = run_stores(dir.path(), "subject", &[(test_case(1, "ae-pay", "pay", "s1"), vec![])]);
    let run = run_oracle(&common::shop_graph(), &args(&[reference], subject, None), &ProgressBar::hidden()).unwrap();
    assert_eq!(run.evaluations[0].verdict(), Some(Verdict::NotVulnerable));
}

#[test]
fn test_inconclusive_and_graph_errors_do_not_abort() {
    let dir = TempDir::new().unwrap();
    let reference = baseline_run(dir.path());
    let subject = run_stores(
        dir.path(),
        "subject",
        &[
            (test_case(1, "ae-view", "view", "s1"), vec![common::SELECT_BALANCE]),
            (test_case(2, "ae-pay", "pay", "s9"), vec![common::INSERT_PAYMENT]),
            (test_case(3, "ae-pay", "pay", "s1"), vec![common::INSERT_PAYMENT]),
        ],
    );
    let run = run_oracle(&common::shop_graph(), &args(&[reference], subject, None), &ProgressBar::hidden()).unwrap();
    assert_eq!(run.summary.inconclusive, 1);
    assert_eq!(run.summary.graph_errors, 1);
    assert_eq!(run.vulnerable, 1);
    let seq_ids: Vec<i64> = run.evaluations.iter().map(Evaluation::seq_id).collect();
    assert_eq!(seq_ids, vec![1, 3]);
}

#[test]
fn test_mismatched_reference_lists_rejected() {
    let dir = TempDir::new().unwrap();
    let reference = baseline_run(dir.path());
    let subject = run_stores(dir.path(), "subject", &[]);
    let mut oracle_args = args(&[reference], subject, None);
    oracle_args.tc_analyzed_references.push_str(",extra.db");
    let result = run_oracle(&common::shop_graph(), &oracle_args, &ProgressBar::hidden());
    assert!(matches!(result, Err(csrf_oracle::errors::OracleError::Config(_))));
}

#[test]
fn test_missing_subject_store_is_database_error() {
    let dir = TempDir::new().unwrap();
    let reference = baseline_run(dir.path());
    let subject = (dir.path().join("nope-tc.db"), dir.path().join("nope-replay.db"));
    let result = run_oracle(&common::shop_graph(), &args(&[reference], subject, None), &ProgressBar::hidden());
    assert!(matches!(result, Err(csrf_oracle::errors::OracleError::Database(_))));
}

#[test]
fn test_executed_query_hash_ignores_literals_and_quotes() {
    let a = ExecutedQuery::new("'INSERT INTO payments (account, amount) VALUES (7, 99)'");
    let b = ExecutedQuery::new(common::INSERT_PAYMENT);
    assert_eq!(a.hash, b.hash);
    assert!(!a.message.starts_with('\''));
}
