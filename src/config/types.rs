use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use crate::classify::DEFAULT_DENYLIST;

pub const DEFAULT_MAX_PARALLEL: usize = 8;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OracleConfig {
    pub graph: Option<GraphConfig>,
    pub protection: Option<ProtectionConfig>,
    pub generation: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GraphConfig {
    /// Event graph snapshot used when none is given on the command line.
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProtectionConfig {
    /// Variable name patterns that never count as anti-CSRF tokens.
    pub denylist: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GenerationConfig {
    pub max_parallel: Option<usize>,
}

impl OracleConfig {
    pub fn snapshot(&self) -> Option<&PathBuf> {
        self.graph.as_ref().and_then(|g| g.snapshot.as_ref())
    }

    pub fn denylist(&self) -> Vec<String> {
        self.protection
            .as_ref()
            .and_then(|p| p.denylist.clone())
            .unwrap_or_else(|| DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect())
    }

    pub fn max_parallel(&self) -> usize {
        self.generation
            .as_ref()
            .and_then(|g| g.max_parallel)
            .unwrap_or(DEFAULT_MAX_PARALLEL)
    }
}
