use std::path::Path;
use std::sync::Arc;
use crate::db::Database;
use crate::errors::OracleError;
use crate::reporting::{batch_progress, format_batch_summary, format_simulated_case};
use crate::tgen::{GenerationMode, GenerationReport, Generator, Selection};
use super::commands::{TgenArgs, TgenCommand};
use super::context::CommandContext;
use tracing::info;

pub async fn handle_tgen(ctx: &CommandContext, command: TgenCommand) -> Result<(), OracleError> {
    let (mode, args) = match command {
        TgenCommand::Protected(args) => (GenerationMode::Protected, args),
        TgenCommand::NotProtected(args) => (GenerationMode::NotProtected, args),
        TgenCommand::Tokens(args) if args.forge => (GenerationMode::ForgedTokens, args.tgen),
        TgenCommand::Tokens(args) => (GenerationMode::Tokens, args.tgen),
    };
    let mut report = generate(ctx, mode, &args).await?;

    if args.simulate {
        for case in &report.test_cases {
            println!("{}", format_simulated_case(case));
        }
    } else {
        store(&args.database, &mut report)?;
    }

    if !ctx.quiet {
        println!("{}", format_batch_summary(&report.summary));
    }
    Ok(())
}

pub async fn generate(
    ctx: &CommandContext,
    mode: GenerationMode,
    args: &TgenArgs,
) -> Result<GenerationReport, OracleError> {
    let graph = ctx.graph().await?;
    let policy = Arc::new(ctx.policy()?);
    let generator = Generator::new(graph, policy, ctx.config.max_parallel());
    let selection = Selection { project: args.project.clone(), operation: args.operation.clone() };

    let progress = batch_progress(ctx.quiet, mode.as_str());
    generator.run(mode, &selection, &progress).await
}

/// Append a batch to a test case store, numbered after the cases already in it.
pub fn store(database: &Path, report: &mut GenerationReport) -> Result<(), OracleError> {
    let db = Database::new(database)?;
    let first = db.next_seq_id()?;
    report.renumber_from(first);
    for case in &report.test_cases {
        db.insert_test_case(&case.test_case)?;
        info!(
            seq_id = case.test_case.seq_id,
            operation = %case.test_case.operation,
            url = %case.test_case.request.url,
            "Test case exported"
        );
    }
    info!(database = %database.display(), first_seq_id = first, batch = %report.batch_id, count = report.test_cases.len(), "Test cases stored");
    Ok(())
}
