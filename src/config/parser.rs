use std::path::Path;
use regex::Regex;
use crate::errors::OracleError;
use super::types::OracleConfig;
use super::schema::CONFIG_SCHEMA;
use tracing::{debug, warn};

const MAX_CONFIG_BYTES: u64 = 1_048_576;

pub async fn parse_config(path: &Path) -> Result<OracleConfig, OracleError> {
    if !path.exists() {
        return Err(OracleError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(OracleError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<OracleConfig, OracleError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    if yaml.is_null() {
        return Ok(OracleConfig::default());
    }

    validate_schema(&yaml)?;

    let config: OracleConfig = serde_yaml::from_value(yaml)?;

    validate_semantics(&config)?;

    Ok(config)
}

/// The optional `--config` file, or defaults.
pub async fn load_config(path: Option<&Path>) -> Result<OracleConfig, OracleError> {
    match path {
        Some(p) => {
            let config = parse_config(p).await?;
            debug!(path = %p.display(), "Configuration loaded");
            Ok(config)
        }
        None => Ok(OracleConfig::default()),
    }
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), OracleError> {
    let json_str = serde_json::to_string(yaml)
        .map_err(|e| OracleError::Config(format!("Config conversion error: {}", e)))?;
    let json_value: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| OracleError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| OracleError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        // Advisory: the typed parse and semantic checks decide.
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

fn validate_semantics(config: &OracleConfig) -> Result<(), OracleError> {
    if let Some(denylist) = config.protection.as_ref().and_then(|p| p.denylist.as_ref()) {
        for pattern in denylist {
            if pattern.is_empty() {
                return Err(OracleError::Config("Empty pattern in protection.denylist".into()));
            }
            Regex::new(pattern).map_err(|e| {
                OracleError::Config(format!("Invalid protection.denylist pattern '{}': {}", pattern, e))
            })?;
        }
        if denylist.is_empty() {
            warn!("Empty protection.denylist: session cookies will count as anti-CSRF tokens");
        }
    }

    if config.generation.as_ref().and_then(|g| g.max_parallel) == Some(0) {
        return Err(OracleError::Config("generation.max_parallel must be at least 1".into()));
    }

    Ok(())
}
