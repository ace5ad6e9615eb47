use crate::errors::OracleError;
use crate::reporting::{format_batch_summary, format_stats_table};
use crate::stats;
use super::context::CommandContext;
use tracing::info;

pub async fn handle_stats(ctx: &CommandContext) -> Result<(), OracleError> {
    let graph = ctx.graph().await?;
    let (rows, summary) = stats::collect(graph.as_ref())?;
    info!(operations = rows.len(), "Statistics collected");

    println!("{}", format_stats_table(&rows));
    if summary.failed() > 0 && !ctx.quiet {
        println!("{}", format_batch_summary(&summary));
    }
    Ok(())
}
