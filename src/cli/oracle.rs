use std::sync::Arc;
use indicatif::ProgressBar;
use serde::Serialize;
use tracing::{info, warn};
use crate::db::Database;
use crate::errors::OracleError;
use crate::graph::EventGraphStore;
use crate::models::BatchSummary;
use crate::oracle::{parse_reference_lists, BaselineCorpus, Evaluation, Oracle};
use crate::reporting::{batch_progress, format_batch_summary, format_evaluation};
use super::commands::OracleArgs;
use super::context::CommandContext;

#[derive(Debug, Serialize)]
pub struct OracleRun {
    pub evaluations: Vec<Evaluation>,
    pub vulnerable: usize,
    pub not_vulnerable: usize,
    pub summary: BatchSummary,
}

pub async fn handle_oracle(ctx: &CommandContext, args: OracleArgs) -> Result<(), OracleError> {
    let graph = ctx.graph().await?;
    let progress = batch_progress(ctx.quiet, "judging test cases");
    let run = run_oracle(graph.as_ref(), &args, &progress)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&run)?);
        return Ok(());
    }

    for evaluation in &run.evaluations {
        println!("{}", format_evaluation(evaluation));
    }
    if !ctx.quiet {
        println!(
            "{} vulnerable, {} not vulnerable",
            run.vulnerable, run.not_vulnerable
        );
        println!("{}", format_batch_summary(&run.summary));
    }
    Ok(())
}

/// Judge every stored test case of `args.tc` against its replayed queries.
pub fn run_oracle(
    graph: &dyn EventGraphStore,
    args: &OracleArgs,
    progress: &ProgressBar,
) -> Result<OracleRun, OracleError> {
    let references = parse_reference_lists(&args.tc_references, &args.tc_analyzed_references)?;
    let baseline = Arc::new(BaselineCorpus::build(&references)?);
    let oracle = Oracle::new(graph, baseline);

    let tc_db = Database::open_existing(&args.tc)?;
    let replay_db = Database::open_existing(&args.tc_analyzed)?;
    let output = args.output.as_deref().map(Database::new).transpose()?;

    let test_cases = tc_db.load_test_cases()?;
    info!(test_cases = test_cases.len(), "Evaluating test cases");
    progress.set_length(test_cases.len() as u64);

    let mut run = OracleRun {
        evaluations: Vec::with_capacity(test_cases.len()),
        vulnerable: 0,
        not_vulnerable: 0,
        summary: BatchSummary::default(),
    };
    for tc in &test_cases {
        let executed = replay_db.load_replay_queries(tc.seq_id)?;
        let evaluation = match oracle.evaluate(tc, &executed) {
            Ok(evaluation) => evaluation,
            Err(e) => {
                warn!(seq_id = tc.seq_id, error = %e, "Test case could not be judged");
                run.summary.absorb(e)?;
                progress.inc(1);
                continue;
            }
        };

        match &evaluation {
            Evaluation::Verdict(report) => {
                if report.verdict.is_vulnerable() {
                    run.vulnerable += 1;
                } else {
                    run.not_vulnerable += 1;
                }
                if let Some(db) = &output {
                    for result in &report.results {
                        db.insert_oracle_result(tc, result, report.verdict)?;
                    }
                }
            }
            Evaluation::Inconclusive { .. } => run.summary.inconclusive += 1,
        }
        run.evaluations.push(evaluation);
        progress.inc(1);
    }
    progress.finish_and_clear();

    info!(
        vulnerable = run.vulnerable,
        not_vulnerable = run.not_vulnerable,
        summary = %run.summary,
        "Oracle finished"
    );
    Ok(run)
}
