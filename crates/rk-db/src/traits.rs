//! Database trait definition

use crate::cursor::Cursor;
use crate::error::DbResult;
use rk_core::Value;

/// Database abstraction trait for relkit
///
/// One implementation is shared by every relation bound to it, so
/// implementations must be Send + Sync and serialize concurrent calls
/// themselves. Every call is a blocking round trip.
pub trait Database: Send + Sync {
    /// Execute one statement with positional `?` parameters.
    ///
    /// Errors are returned as produced by the driver; nothing is retried.
    fn query(&self, sql: &str, args: &[Value]) -> DbResult<Cursor>;

    /// Catalog that table names are resolved in, when the backend has one.
    ///
    /// Two-part names are ambiguous when a catalog and a schema share a
    /// name, so SQL built against a backend with a catalog qualifies with it.
    fn catalog(&self) -> Option<&str> {
        None
    }

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
