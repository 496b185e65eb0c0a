//! Error types for rk-core

use thiserror::Error;

/// Core error type for relkit
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: A name that must be non-empty was empty
    #[error("[E004] Empty name in {context}")]
    EmptyName { context: String },

    /// E005: Full table name could not be parsed
    #[error("[E005] Invalid table name '{name}': expected \"database\".\"table\" or database.table")]
    InvalidTableName { name: String },

    /// E006: Adding a foreign-key edge would close a cycle
    #[error("[E006] Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// E007: The same foreign-key edge was loaded twice
    #[error("[E007] Duplicate dependency: {parent} -> {child}")]
    DuplicateDependency { parent: String, child: String },

    /// E008: A value cannot be turned into an insertable record
    #[error("[E008] Datatype {found} cannot be inserted: expected a field-named record or a fixed-schema row")]
    UnsupportedRecordType { found: String },

    /// E009: Fixed-schema row built with mismatched names and values
    #[error("[E009] Row has {values} values for {fields} fields")]
    RowArity { fields: usize, values: usize },

    /// E010: Blob payload could not be decoded
    #[error("[E010] Cannot unpack blob: {message}")]
    BlobDecode { message: String },

    /// E011: IO error with file path context
    #[error("[E011] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E012: YAML parse error
    #[error("[E012] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
