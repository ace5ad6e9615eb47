use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use crate::db::Database;
use crate::errors::OracleError;
use super::hashing::{query_hash, sanitize};

/// A reference run: its test case store and the store of queries it fired on replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencePair {
    pub test_cases: PathBuf,
    pub replay: PathBuf,
}

/// Pair comma-separated reference lists positionally.
pub fn parse_reference_lists(test_cases: &str, replays: &str) -> Result<Vec<ReferencePair>, OracleError> {
    let split = |s: &str| -> Vec<PathBuf> {
        s.split(',').map(str::trim).filter(|p| !p.is_empty()).map(PathBuf::from).collect()
    };
    let test_cases = split(test_cases);
    let replays = split(replays);
    if test_cases.len() != replays.len() {
        return Err(OracleError::Config(format!(
            "{} reference test case stores but {} reference replay stores",
            test_cases.len(),
            replays.len()
        )));
    }
    Ok(test_cases
        .into_iter()
        .zip(replays)
        .map(|(test_cases, replay)| ReferencePair { test_cases, replay })
        .collect())
}

/// Hashes of every query seen in reference runs: the queries that fire
/// regardless of any mutation. Built once, then only read.
#[derive(Debug, Clone, Default)]
pub struct BaselineCorpus {
    hashes: HashSet<String>,
}

impl BaselineCorpus {
    pub fn from_hashes<I, S>(hashes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { hashes: hashes.into_iter().map(Into::into).collect() }
    }

    pub fn build(pairs: &[ReferencePair]) -> Result<Self, OracleError> {
        let mut corpus = Self::default();
        for pair in pairs {
            corpus.extend_from(&pair.test_cases, &pair.replay)?;
        }
        info!(references = pairs.len(), hashes = corpus.len(), "Baseline corpus built");
        Ok(corpus)
    }

    fn extend_from(&mut self, test_cases: &Path, replay: &Path) -> Result<(), OracleError> {
        let tc_db = Database::open_existing(test_cases)?;
        let replay_db = Database::open_existing(replay)?;
        for tc in tc_db.load_test_cases()? {
            for query in replay_db.load_replay_queries(tc.seq_id)? {
                self.insert_query(&query);
            }
        }
        debug!(test_cases = %test_cases.display(), replay = %replay.display(), "Reference run loaded");
        Ok(())
    }

    pub fn insert_query(&mut self, raw: &str) {
        self.hashes.insert(query_hash(sanitize(raw)));
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.hashes.contains(hash)
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}
