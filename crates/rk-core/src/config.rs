//! Configuration types and parsing for relkit.yml

use crate::error::{CoreError, CoreResult};
use crate::serde_helpers::default_true;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration from relkit.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Database (DuckDB schema) that tables are declared in when none is given
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Require interactive confirmation before delete and drop
    #[serde(default = "default_true")]
    pub safe_mode: bool,

    /// Codec used for blob attributes
    #[serde(default)]
    pub codec: CodecKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            schema: default_schema(),
            safe_mode: true,
            codec: CodecKind::default(),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (DuckDB file or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Blob codec selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    /// Tagged payloads: raw bytes verbatim, everything else as JSON
    #[default]
    Tagged,
}

impl std::fmt::Display for CodecKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecKind::Tagged => write!(f, "tagged"),
        }
    }
}

const DEFAULT_DB_PATH: &str = ":memory:";

const CONFIG_FILE_NAMES: [&str; 2] = ["relkit.yml", "relkit.yaml"];

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_schema() -> String {
    "main".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> CoreResult<Self> {
        let config: Config =
            serde_yaml::from_str(content).map_err(|e| CoreError::ConfigParseError {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory
    /// Looks for relkit.yml or relkit.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
        })
    }

    /// Whether the configured database lives only in memory
    pub fn is_in_memory(&self) -> bool {
        self.database.path == DEFAULT_DB_PATH
    }

    fn validate(&self) -> CoreResult<()> {
        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }
        if self.schema.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "schema cannot be empty".to_string(),
            });
        }
        if self.schema.contains('.') {
            return Err(CoreError::ConfigInvalid {
                message: format!("schema '{}' must not be qualified", self.schema),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
