mod common;

use std::sync::Arc;
use csrf_oracle::classify::ProtectionPolicy;
use csrf_oracle::cli::{CommandContext, GlobalArgs, TgenArgs};
use csrf_oracle::db::Database;
use csrf_oracle::tgen::{GenerationMode, Generator, Selection};
use indicatif::ProgressBar;
use tempfile::TempDir;

fn generator(max_parallel: usize) -> Generator {
    Generator::new(
        Arc::new(common::shop_graph()),
        Arc::new(ProtectionPolicy::standard().unwrap()),
        max_parallel,
    )
}

fn shop() -> Selection {
    Selection { project: "shop".into(), operation: None }
}

#[tokio::test]
async fn test_protected_requests() {
    let report = generator(4).run(GenerationMode::Protected, &shop(), &ProgressBar::hidden()).await.unwrap();
    assert_eq!(report.test_cases.len(), 1);
    assert_eq!(report.summary.generated, 1);
    assert_eq!(report.summary.skipped, 1);

    let tc = &report.test_cases[0].test_case;
    assert_eq!(tc.seq_id, 1);
    assert_eq!(tc.operation, "pay");
    assert_eq!(tc.request_event_id, "ae-pay");
    assert_eq!(tc.session, "s1");
    assert!(tc.mutated_node_id.is_none());
    assert_eq!(tc.request.body.as_deref(), Some(r#"{"csrf":"tok-s1","amount":"10"}"#));
}

#[tokio::test]
async fn test_not_protected_requests() {
    let report = generator(4).run(GenerationMode::NotProtected, &shop(), &ProgressBar::hidden()).await.unwrap();
    assert_eq!(report.test_cases.len(), 1);
    let tc = &report.test_cases[0].test_case;
    assert_eq!(tc.operation, "comment");
    assert_eq!(tc.request.url, "https://shop.local/comment");
    assert_eq!(tc.request.body.as_deref(), Some("comment=hi+there"));
}

#[tokio::test]
async fn test_token_stripping() {
    let report = generator(2).run(GenerationMode::Tokens, &shop(), &ProgressBar::hidden()).await.unwrap();
    // The cookie pairs of pay and comment are denylisted.
    assert_eq!(report.summary.skipped, 2);
    assert_eq!(report.test_cases.len(), 1);

    let case = &report.test_cases[0];
    assert_eq!(case.label, Some("session_unique"));
    assert_eq!(case.variable_name.as_deref(), Some("csrf"));
    assert_eq!(case.test_case.mutated_node_id.as_deref(), Some("r1-csrf"));
    assert_eq!(case.test_case.source_var_id.as_deref(), Some("v-csrf-1"));
    assert_eq!(case.test_case.request.body.as_deref(), Some(r#"{"amount":"10"}"#));
}

#[tokio::test]
async fn test_forged_token_from_other_session() {
    let report = generator(2).run(GenerationMode::ForgedTokens, &shop(), &ProgressBar::hidden()).await.unwrap();
    assert_eq!(report.test_cases.len(), 1);
    assert_eq!(
        report.test_cases[0].test_case.request.body.as_deref(),
        Some(r#"{"csrf":"tok-s2","amount":"10"}"#)
    );
}

#[tokio::test]
async fn test_forge_without_other_session_is_skipped() {
    let mut snapshot = common::shop_snapshot();
    snapshot.variables.retain(|v| v.uuid != "v-csrf-2");
    let generator = Generator::new(
        Arc::new(csrf_oracle::graph::MemoryGraph::from_snapshot(snapshot).unwrap()),
        Arc::new(ProtectionPolicy::standard().unwrap()),
        2,
    );
    let report = generator.run(GenerationMode::ForgedTokens, &shop(), &ProgressBar::hidden()).await.unwrap();
    assert!(report.test_cases.is_empty());
    assert_eq!(report.summary.skipped, 3);
}

#[tokio::test]
async fn test_numbering_independent_of_parallelism() {
    let serial = generator(1).run(GenerationMode::Tokens, &shop(), &ProgressBar::hidden()).await.unwrap();
    let parallel = generator(8).run(GenerationMode::Tokens, &shop(), &ProgressBar::hidden()).await.unwrap();
    let key = |r: &csrf_oracle::tgen::GenerationReport| -> Vec<(i64, String, String)> {
        r.test_cases
            .iter()
            .map(|c| (c.test_case.seq_id, c.test_case.operation.clone(), c.test_case.request.body.clone().unwrap_or_default()))
            .collect()
    };
    assert_eq!(key(&serial), key(&parallel));
}

#[tokio::test]
async fn test_structural_error_counted_not_fatal() {
    let mut snapshot = common::shop_snapshot();
    // Break the comment request: a stray terminal directly under the request root.
    for tree in snapshot.parse_trees.iter_mut().filter(|t| t.uuid == "pt-r6") {
        if let csrf_oracle::models::NodeKind::NonTerminal { children, .. } = &mut tree.kind {
            children.push(csrf_oracle::models::Node::terminal("r6-junk", "junk", 9, "?"));
        }
    }
    let generator = Generator::new(
        Arc::new(csrf_oracle::graph::MemoryGraph::from_snapshot(snapshot).unwrap()),
        Arc::new(ProtectionPolicy::standard().unwrap()),
        2,
    );
    let report = generator.run(GenerationMode::NotProtected, &shop(), &ProgressBar::hidden()).await.unwrap();
    assert!(report.test_cases.is_empty());
    assert_eq!(report.summary.structural_errors, 1);
    assert_eq!(report.summary.skipped, 1);
}

fn node_mut<'a>(node: &'a mut csrf_oracle::models::Node, id: &str) -> Option<&'a mut csrf_oracle::models::Node> {
    if node.uuid == id {
        return Some(node);
    }
    if let csrf_oracle::models::NodeKind::NonTerminal { children, .. } = &mut node.kind {
        for child in children.iter_mut() {
            if let Some(found) = node_mut(child, id) {
                return Some(found);
            }
        }
    }
    None
}

#[tokio::test]
async fn test_reconstruction_anomaly_counted() {
    let mut snapshot = common::shop_snapshot();
    // A query value with no name in front of it.
    for tree in snapshot.parse_trees.iter_mut().filter(|t| t.uuid == "pt-r6") {
        let url = node_mut(tree, "r6-url").unwrap();
        if let csrf_oracle::models::NodeKind::NonTerminal { children, .. } = &mut url.kind {
            children.push(csrf_oracle::models::Node::non_terminal(
                "r6-qs",
                "query-string",
                3,
                vec![csrf_oracle::models::Node::terminal("r6-orphan", "param-value", 0, "x")],
            ));
        }
    }
    let generator = Generator::new(
        Arc::new(csrf_oracle::graph::MemoryGraph::from_snapshot(snapshot).unwrap()),
        Arc::new(ProtectionPolicy::standard().unwrap()),
        2,
    );
    let report = generator.run(GenerationMode::NotProtected, &shop(), &ProgressBar::hidden()).await.unwrap();
    assert_eq!(report.test_cases.len(), 1);
    assert_eq!(report.test_cases[0].test_case.request.url, "https://shop.local/comment");
    assert_eq!(report.summary.anomalies, 1);
    assert_eq!(report.summary.structural_errors, 0);
}

#[tokio::test]
async fn test_generate_from_snapshot_file_and_store() {
    let dir = TempDir::new().unwrap();
    let graph_path = dir.path().join("graph.json");
    tokio::fs::write(&graph_path, serde_json::to_string(&common::shop_snapshot()).unwrap())
        .await
        .unwrap();

    let global = GlobalArgs { graph: Some(graph_path), quiet: true, ..Default::default() };
    let ctx = CommandContext::load(&global).await.unwrap();
    let args = TgenArgs {
        project: "shop".into(),
        database: dir.path().join("tc.db"),
        operation: Some("pay".into()),
        simulate: false,
    };
    let mut report = csrf_oracle::cli::tgen::generate(&ctx, GenerationMode::Protected, &args).await.unwrap();
    assert_eq!(report.test_cases.len(), 1);
    csrf_oracle::cli::tgen::store(&args.database, &mut report).unwrap();

    let stored = Database::open_existing(&args.database).unwrap().load_test_cases().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].seq_id, 1);
    assert_eq!(stored[0].batch_id, report.batch_id);
    assert_eq!(stored[0].request, report.test_cases[0].test_case.request);
}

#[tokio::test]
async fn test_second_batch_continues_numbering() {
    let dir = TempDir::new().unwrap();
    let database = dir.path().join("tc.db");

    let mut protected = generator(2).run(GenerationMode::Protected, &shop(), &ProgressBar::hidden()).await.unwrap();
    let mut tokens = generator(2).run(GenerationMode::Tokens, &shop(), &ProgressBar::hidden()).await.unwrap();
    // Both batches number from 1 on their own.
    assert_eq!(protected.test_cases[0].test_case.seq_id, 1);
    assert_eq!(tokens.test_cases[0].test_case.seq_id, 1);

    csrf_oracle::cli::tgen::store(&database, &mut protected).unwrap();
    csrf_oracle::cli::tgen::store(&database, &mut tokens).unwrap();
    assert_eq!(tokens.test_cases[0].test_case.seq_id, 2);

    let stored = Database::open_existing(&database).unwrap().load_test_cases().unwrap();
    let ids: Vec<(i64, &str)> = stored.iter().map(|tc| (tc.seq_id, tc.batch_id.as_str())).collect();
    assert_eq!(ids, vec![(1, protected.batch_id.as_str()), (2, tokens.batch_id.as_str())]);
    assert!(stored[0].mutated_node_id.is_none());
    assert_eq!(stored[1].mutated_node_id.as_deref(), Some("r1-csrf"));
}
