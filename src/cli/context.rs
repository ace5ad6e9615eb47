use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use crate::classify::ProtectionPolicy;
use crate::config::{load_config, OracleConfig};
use crate::errors::OracleError;
use crate::graph::{EventGraphStore, MemoryGraph};
use super::commands::GlobalArgs;

/// Configuration and graph shared by every command handler.
pub struct CommandContext {
    pub config: OracleConfig,
    pub quiet: bool,
    graph_path: Option<PathBuf>,
}

impl CommandContext {
    pub async fn load(global: &GlobalArgs) -> Result<Self, OracleError> {
        let config = load_config(global.config.as_deref()).await?;
        let graph_path = global.graph.clone().or_else(|| config.snapshot().cloned());
        Ok(Self { config, quiet: global.quiet, graph_path })
    }

    pub async fn graph(&self) -> Result<Arc<dyn EventGraphStore>, OracleError> {
        let path = self.graph_path.as_ref().ok_or_else(|| {
            OracleError::Config("No event graph: pass --graph or set graph.snapshot in the config".into())
        })?;
        let graph = MemoryGraph::load(path).await?;
        info!(path = %path.display(), "Event graph loaded");
        Ok(Arc::new(graph))
    }

    pub fn policy(&self) -> Result<ProtectionPolicy, OracleError> {
        ProtectionPolicy::new(&self.config.denylist())
    }
}
