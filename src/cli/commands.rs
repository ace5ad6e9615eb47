use std::path::PathBuf;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "csrf-oracle", version = env!("CSRF_ORACLE_VERSION"), about = "Trace-driven CSRF test case generator and vulnerability oracle")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args, Clone, Debug, Default)]
pub struct GlobalArgs {
    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Event graph snapshot (JSON); overrides graph.snapshot from the config
    #[arg(short, long, global = true)]
    pub graph: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count operations, state-changing operations and singleton operations
    Stats,
    /// Generate CSRF test cases from the event graph
    Tgen {
        #[command(subcommand)]
        mode: TgenCommand,
    },
    /// Judge replayed test cases against the model and reference runs
    Oracle(OracleArgs),
}

#[derive(Subcommand)]
pub enum TgenCommand {
    /// One unmutated request per protected operation leading to a singleton query
    Protected(TgenArgs),
    /// One unmutated request per unprotected operation leading to a singleton query
    #[command(name = "not_protected")]
    NotProtected(TgenArgs),
    /// One request per anti-CSRF token with the token removed or forged
    Tokens(TokenArgs),
}

#[derive(Args, Clone, Debug)]
pub struct TgenArgs {
    /// Project name
    pub project: String,

    /// SQLite store the test cases are written to
    pub database: PathBuf,

    /// Restrict generation to one operation
    #[arg(short, long)]
    pub operation: Option<String>,

    /// Print the test cases instead of storing them
    #[arg(long)]
    pub simulate: bool,
}

#[derive(Args, Clone, Debug)]
pub struct TokenArgs {
    #[command(flatten)]
    pub tgen: TgenArgs,

    /// Replace each token with one seen in another session or user instead of removing it
    #[arg(long)]
    pub forge: bool,
}

#[derive(Args, Clone, Debug)]
pub struct OracleArgs {
    /// Comma-separated test case stores of the reference runs
    pub tc_references: String,

    /// Comma-separated replay stores of the reference runs, in the same order
    pub tc_analyzed_references: String,

    /// Test case store under analysis
    pub tc: PathBuf,

    /// Replay store of the test cases under analysis
    pub tc_analyzed: PathBuf,

    /// Store the per-query results in this SQLite database
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
