//! rk-sql - SQL layer for relkit
//!
//! This crate wraps sqlparser-rs for DuckDB and compiles table definitions
//! into `CREATE TABLE` statements, resolving foreign-key targets through a
//! declaration context.

pub mod declare;
pub mod dialect;
pub mod error;
pub mod parser;

pub use declare::{DeclarationCompiler, DeclarationContext, SqlDeclarationCompiler};
pub use dialect::{DuckDbDialect, SqlDialect};
pub use error::{SqlError, SqlResult};
pub use parser::SqlParser;
