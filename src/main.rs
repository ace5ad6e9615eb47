use clap::Parser;
use csrf_oracle::cli::{self, CommandContext, Commands};
use csrf_oracle::errors::OracleError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.global.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(!cli.global.no_color)
        .init();

    if cli.global.no_color {
        console::set_colors_enabled(false);
    }

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let exit_code = match &e {
            OracleError::Config(_) => 2,
            OracleError::Database(_) => 3,
            OracleError::Graph(_) => 4,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: cli::Cli) -> Result<(), OracleError> {
    let ctx = CommandContext::load(&cli.global).await?;
    match cli.command {
        Commands::Stats => cli::stats::handle_stats(&ctx).await,
        Commands::Tgen { mode } => cli::tgen::handle_tgen(&ctx, mode).await,
        Commands::Oracle(args) => cli::oracle::handle_oracle(&ctx, args).await,
    }
}
