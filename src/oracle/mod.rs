//! Decides whether a replayed test case still changed server state.

pub mod baseline;
pub mod engine;
pub mod hashing;

pub use baseline::{parse_reference_lists, BaselineCorpus, ReferencePair};
pub use engine::{judge, Evaluation, ExecutedQuery, ModeledState, Oracle, TestCaseReport};
pub use hashing::{normalize_query, query_hash, sanitize};
