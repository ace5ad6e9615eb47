use console::style;
use crate::models::{BatchSummary, Verdict};
use crate::oracle::Evaluation;
use crate::stats::OperationStats;
use crate::tgen::GeneratedTestCase;

const PROJECT_WIDTH: usize = 24;
const OPERATION_WIDTH: usize = 60;
const COUNT_WIDTH: usize = 14;
const QUERY_PREVIEW: usize = 40;

pub fn format_stats_table(rows: &[OperationStats]) -> String {
    let header = format!(
        "| {:^pw$} | {:^ow$} | {:^cw$} | {:^cw$} | {:^cw$}",
        "PROJECT",
        "OPERATION",
        "OPs",
        "SC OPs",
        "SC STon OPs",
        pw = PROJECT_WIDTH,
        ow = OPERATION_WIDTH,
        cw = COUNT_WIDTH,
    );
    let mut out = String::new();
    out.push_str(&header);
    out.push('\n');
    out.push_str(&"=".repeat(header.chars().count()));
    out.push('\n');
    for row in rows {
        out.push_str(&format!(
            "| {:<pw$} | {:<ow$} | {:>cw$} | {:>cw$} | {:>cw$}\n",
            row.project,
            row.operation,
            row.operations,
            row.state_changing,
            row.singleton,
            pw = PROJECT_WIDTH,
            ow = OPERATION_WIDTH,
            cw = COUNT_WIDTH,
        ));
    }
    out
}

fn verdict_banner(verdict: Verdict) -> String {
    match verdict {
        Verdict::Vulnerable => format!(">>> {} <<<", style(verdict.as_str()).red().bold()),
        Verdict::NotVulnerable => format!(">>> {} <<<", style(verdict.as_str()).green()),
    }
}

fn preview(message: &str) -> String {
    message.chars().take(QUERY_PREVIEW).collect()
}

/// Per-test-case block: header line, one line per executed query, verdict banner.
pub fn format_evaluation(evaluation: &Evaluation) -> String {
    match evaluation {
        Evaluation::Verdict(report) => {
            let tc = &report.test_case;
            let mut out = format!(
                "\n{} {} {} {} modeled={}\n{}\n",
                tc.seq_id,
                tc.project,
                tc.operation,
                tc.request.url,
                report.modeled,
                "=".repeat(80)
            );
            for r in &report.results {
                out.push_str(&format!(
                    "    {} = {:<14} {:<12} {:<10} {}\n",
                    r.query_hash,
                    if r.observed { "observed" } else { "not observed" },
                    if r.unique { "unique" } else { "not unique" },
                    r.trace_pattern_label(),
                    preview(&r.query_message),
                ));
            }
            out.push_str(&verdict_banner(report.verdict));
            out.push('\n');
            out
        }
        Evaluation::Inconclusive { seq_id, reason } => {
            format!("\n{} {} ({})\n", seq_id, style("INCONCLUSIVE").yellow(), reason)
        }
    }
}

pub fn format_batch_summary(summary: &BatchSummary) -> String {
    format!(
        "Summary: {} generated, {} skipped, {} structural errors, {} integrity errors, {} graph errors, {} inconclusive, {} anomalies",
        summary.generated,
        summary.skipped,
        summary.structural_errors,
        summary.integrity_errors,
        summary.graph_errors,
        summary.inconclusive,
        summary.anomalies,
    )
}

/// One comma-separated line per test case, printed by `--simulate`.
pub fn format_simulated_case(case: &GeneratedTestCase) -> String {
    let tc = &case.test_case;
    let mut fields = vec![tc.seq_id.to_string()];
    if let Some(label) = case.label {
        fields.push(label.to_string());
    }
    fields.push(tc.project.clone());
    fields.push(tc.operation.clone());
    if let Some(name) = &case.variable_name {
        fields.push(name.clone());
        fields.push(case.variable_value.clone().unwrap_or_default());
    }
    fields.push(tc.request.method.clone());
    fields.push(tc.request.url.clone());
    fields.join(",")
}
