//! Error types for rk-relation

use rk_core::CoreError;
use rk_db::DbError;
use rk_sql::SqlError;
use thiserror::Error;

/// Relation-level errors
#[derive(Error, Debug)]
pub enum RelationError {
    /// Record names a field the table does not have (R001)
    #[error("[R001] Field '{attribute}' is not in the heading of {table}")]
    UnknownAttribute { attribute: String, table: String },

    /// The database could not be created (R002)
    #[error("[R002] Database '{database}' could not be created: {source}")]
    DatabaseCreationFailed {
        database: String,
        #[source]
        source: DbError,
    },

    /// Operation needs a table that does not exist (R003)
    #[error("[R003] Table {table} is not declared")]
    NotDeclared { table: String },

    /// Shared dependency graph lock poisoned (R004)
    #[error("[R004] Dependency graph lock poisoned: {0}")]
    GraphPoisoned(String),

    /// Algebra operation that cannot produce a valid expression (R005)
    #[error("[R005] Invalid expression: {0}")]
    InvalidExpression(String),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Sql(#[from] SqlError),
}

/// Result type alias for RelationError
pub type RelResult<T> = Result<T, RelationError>;
