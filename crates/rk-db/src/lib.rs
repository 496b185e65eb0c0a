//! rk-db - Database abstraction layer for relkit
//!
//! This crate provides the blocking `Database` trait, the materialized
//! `Cursor` it returns, an embedded DuckDB implementation, and the catalog
//! lookups relations use to resolve headings, keys and storage size.

pub mod catalog;
pub mod cursor;
pub mod duckdb;
pub mod error;
pub mod traits;

pub use catalog::TableStatus;
pub use cursor::Cursor;
pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::Database;
