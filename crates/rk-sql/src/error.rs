//! Error types for rk-sql

use thiserror::Error;

/// SQL parsing and declaration errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// SQL parse error (S001)
    #[error("[S001] SQL parse error at line {line}, column {column}: {message}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    /// Empty SQL (S002)
    #[error("[S002] SQL is empty")]
    EmptySql,

    /// Statement of the wrong kind (S003)
    #[error("[S003] Unsupported SQL statement type: {0}")]
    UnsupportedStatement(String),

    /// Tokenizer rejected the input (S004)
    #[error("[S004] SQL tokenize error: {0}")]
    TokenizeError(String),

    /// Foreign key names a table the context does not know (S005)
    #[error("[S005] Table '{table}' references unknown table '{name}'")]
    UnresolvedReference { name: String, table: String },

    /// Definition has no content (S006)
    #[error("[S006] Definition of '{table}' is empty")]
    EmptyDefinition { table: String },
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
