pub mod commands;
pub mod context;
pub mod oracle;
pub mod stats;
pub mod tgen;

pub use commands::{Cli, Commands, GlobalArgs, OracleArgs, TgenArgs, TgenCommand, TokenArgs};
pub use context::CommandContext;
