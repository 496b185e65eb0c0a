//! Table declarations and schema files.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A table to register: its name within the database and its definition.
///
/// The definition is the column and constraint list of a `CREATE TABLE`
/// statement; foreign keys may name other tables of the same schema by their
/// bare name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSpec {
    pub name: String,
    pub definition: String,
}

impl TableSpec {
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
        }
    }
}

/// A YAML file listing tables to declare, in declaration order.
///
/// ```yaml
/// database: lab
/// tables:
///   - name: subject
///     definition: |
///       subject_id INTEGER PRIMARY KEY,
///       species VARCHAR NOT NULL
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    /// Target database; falls back to the configured schema when absent
    #[serde(default)]
    pub database: Option<String>,

    pub tables: Vec<TableSpec>,
}

impl SchemaFile {
    /// Load and validate a schema file
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let file: SchemaFile = serde_yaml::from_str(&content)?;
        file.validate()?;
        Ok(file)
    }

    /// Check table names are non-empty and unique
    pub fn validate(&self) -> CoreResult<()> {
        let mut seen = HashSet::new();
        for spec in &self.tables {
            if spec.name.trim().is_empty() {
                return Err(CoreError::EmptyName {
                    context: "table name in schema file".into(),
                });
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("table '{}' is declared twice", spec.name),
                });
            }
        }
        Ok(())
    }
}
