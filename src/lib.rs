//! Trace-driven CSRF testing: rebuild captured requests from their parse
//! trees, generate mutated test cases, and judge replayed runs by the
//! backend queries they fire.

pub mod classify;
pub mod cli;
pub mod codec;
pub mod config;
pub mod db;
pub mod errors;
pub mod graph;
pub mod models;
pub mod oracle;
pub mod reporting;
pub mod stats;
pub mod tgen;
