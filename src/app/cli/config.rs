//! TOML configuration file parsing and loading
//!
//! Lookup order: the file given with `--config-file` (which must exist),
//! then `<config dir>/Reporank/reporank.toml` when present, otherwise the
//! built-in defaults. Every section and key is optional.
//!
//! ```toml
//! [pool]
//! capacity = 8
//!
//! [analysis]
//! subtasks = ["code_statistics", "test_results", "lint_findings", "dependencies"]
//! subtask_timeout_secs = 280
//! toolchain = "1.22"
//!
//! [runner]
//! code_statistics = ["reporank-stats"]
//! test_results = ["reporank-test", "--cover"]
//!
//! [storage]
//! directory = "/var/lib/reporank"
//! ```

use crate::analysis::api::{AnalyzerConfig, ValidationPolicy};
use crate::backend::api::DEFAULT_API_BASE;
use crate::model::api::SubtaskKind;
use crate::pool::api::PoolConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file does not exist: {path}")]
    NotFound { path: PathBuf },

    #[error("Error reading configuration file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Error parsing configuration file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration value for '{field}': {message}")]
    Invalid { field: String, message: String },
}

impl crate::core::error_handling::ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::NotFound { .. } => Some("The specified configuration file does not exist"),
            ConfigError::Read { message, .. }
            | ConfigError::Parse { message, .. }
            | ConfigError::Invalid { message, .. } => Some(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolSection {
    pub capacity: usize,
    pub use_cache: bool,
}

impl Default for PoolSection {
    fn default() -> Self {
        let defaults = PoolConfig::default();
        Self {
            capacity: defaults.capacity,
            use_cache: defaults.use_cache,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisSection {
    pub subtasks: Vec<SubtaskKind>,
    pub subtask_timeout_secs: u64,
    pub metadata_timeout_secs: u64,
    pub toolchain: String,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            subtasks: SubtaskKind::default_set(),
            subtask_timeout_secs: 280,
            metadata_timeout_secs: 30,
            toolchain: "1.22".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// Applied only when `--log-level` is not given
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSection {
    /// Records are kept in memory when unset
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostSection {
    pub api_base: String,
    /// Environment variable holding an API token
    pub token_env: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for HostSection {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token_env: Some("GITHUB_TOKEN".to_string()),
            request_timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringSection {
    /// Criteria to keep; empty keeps every built-in criterion
    pub criteria: Vec<String>,
    /// Lint checks always listed in the lint details, even when clean
    pub lint_checks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub pool: PoolSection,
    pub analysis: AnalysisSection,
    pub validation: ValidationPolicy,
    pub logging: LoggingSection,
    /// Command line per subtask kind
    pub runner: BTreeMap<SubtaskKind, Vec<String>>,
    pub storage: StorageSection,
    pub host: HostSection,
    pub scoring: ScoringSection,
}

impl Config {
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Reject values no component can work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, message: &str| {
            Err(ConfigError::Invalid {
                field: field.to_string(),
                message: message.to_string(),
            })
        };

        if self.pool.capacity == 0 {
            return invalid("pool.capacity", "must be at least 1");
        }
        if self.analysis.subtasks.is_empty() {
            return invalid("analysis.subtasks", "at least one subtask is required");
        }
        if self.analysis.subtask_timeout_secs == 0 {
            return invalid("analysis.subtask_timeout_secs", "must be at least 1");
        }
        if self.analysis.metadata_timeout_secs == 0 {
            return invalid("analysis.metadata_timeout_secs", "must be at least 1");
        }
        if self.analysis.toolchain.trim().is_empty() {
            return invalid("analysis.toolchain", "must not be empty");
        }
        if let Some((kind, _)) = self.runner.iter().find(|(_, argv)| argv.is_empty()) {
            return invalid(&format!("runner.{}", kind), "command must not be empty");
        }
        Ok(())
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            capacity: self.pool.capacity,
            use_cache: self.pool.use_cache,
        }
    }

    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            subtasks: self.analysis.subtasks.clone(),
            subtask_timeout: Duration::from_secs(self.analysis.subtask_timeout_secs),
            metadata_timeout: Duration::from_secs(self.analysis.metadata_timeout_secs),
            validation: self.validation.clone(),
        }
    }
}

/// Default configuration file location, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("Reporank").join("reporank.toml"))
}

/// Locate and parse the configuration file
///
/// Returns the configuration and the path it came from (`None` when the
/// built-in defaults are used).
pub async fn load_config(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>), ConfigError> {
    let path = match explicit {
        Some(path) if !path.exists() => {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok((Config::default(), None)),
        },
    };

    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.clone(),
            message: e.to_string(),
        })?;
    let config = Config::from_toml(&contents, &path)?;
    log::debug!("Loaded configuration from {}", path.display());
    Ok((config, Some(path)))
}
