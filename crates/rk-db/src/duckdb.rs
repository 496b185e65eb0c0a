//! DuckDB database backend implementation

use crate::cursor::Cursor;
use crate::error::{DbError, DbResult};
use crate::traits::Database;
use chrono::{DateTime, Datelike, NaiveDate};
use duckdb::types::{TimeUnit, Value as DuckValue, ValueRef};
use duckdb::Connection;
use rk_core::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Days between 0001-01-01 (CE day 1) and 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Leading keywords of statements that produce a result set
const ROW_RETURNING: &[&str] = &[
    "SELECT", "WITH", "SHOW", "DESCRIBE", "PRAGMA", "FROM", "VALUES", "SUMMARIZE", "EXPLAIN",
    "CALL", "TABLE",
];

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,

    /// Catalog of the opened database: "memory", or the file stem
    catalog: String,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Self::with_connection(conn)
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> DbResult<Self> {
        let catalog: String =
            conn.query_row("SELECT current_database()", [], |row| row.get(0))?;
        Ok(Self {
            conn: Mutex::new(conn),
            catalog,
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Run a statement that produces a result set
    fn query_rows(conn: &Connection, sql: &str, params: &[DuckValue]) -> DbResult<Cursor> {
        let mut stmt = conn.prepare(sql)?;

        // Column metadata is only reliable after execution, so rows are
        // collected first.
        let rows: Vec<Vec<Value>> = stmt
            .query_map(duckdb::params_from_iter(params.iter()), |row| {
                let col_count = row.as_ref().column_count();
                (0..col_count)
                    .map(|i| row.get_ref(i).map(from_duckdb_value))
                    .collect::<duckdb::Result<Vec<Value>>>()
            })?
            .collect::<Result<_, _>>()?;

        let columns = (0..stmt.column_count())
            .map(|i| {
                stmt.column_name(i)
                    .map_or("?".to_string(), |v| v.to_string())
            })
            .collect();

        Ok(Cursor::with_rows(columns, rows))
    }
}

impl Database for DuckDbBackend {
    fn query(&self, sql: &str, args: &[Value]) -> DbResult<Cursor> {
        let params: Vec<DuckValue> = args.iter().map(to_duckdb_value).collect();
        let conn = self.lock()?;
        if returns_rows(sql) {
            Self::query_rows(&conn, sql, &params)
        } else {
            let affected = conn.execute(sql, duckdb::params_from_iter(params.iter()))?;
            Ok(Cursor::affected(affected))
        }
    }

    fn catalog(&self) -> Option<&str> {
        Some(&self.catalog)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

/// Whether a statement's leading keyword marks it as row-returning
fn returns_rows(sql: &str) -> bool {
    let first = sql
        .trim_start_matches(|c: char| c.is_whitespace() || c == '(')
        .split(|c: char| !c.is_ascii_alphabetic())
        .next()
        .unwrap_or_default();
    ROW_RETURNING
        .iter()
        .any(|kw| kw.eq_ignore_ascii_case(first))
}

fn to_duckdb_value(value: &Value) -> DuckValue {
    match value {
        Value::Null => DuckValue::Null,
        Value::Bool(b) => DuckValue::Boolean(*b),
        Value::Int(n) => DuckValue::BigInt(*n),
        Value::Float(x) => DuckValue::Double(*x),
        Value::Text(s) => DuckValue::Text(s.clone()),
        Value::Bytes(bytes) => DuckValue::Blob(bytes.clone()),
        Value::Date(d) => DuckValue::Date32(d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE),
        Value::Timestamp(ts) => {
            DuckValue::Timestamp(TimeUnit::Microsecond, ts.and_utc().timestamp_micros())
        }
    }
}

fn from_duckdb_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(b) => Value::Bool(b),
        ValueRef::TinyInt(n) => Value::Int(n.into()),
        ValueRef::SmallInt(n) => Value::Int(n.into()),
        ValueRef::Int(n) => Value::Int(n.into()),
        ValueRef::BigInt(n) => Value::Int(n),
        ValueRef::UTinyInt(n) => Value::Int(n.into()),
        ValueRef::USmallInt(n) => Value::Int(n.into()),
        ValueRef::UInt(n) => Value::Int(n.into()),
        ValueRef::UBigInt(n) => i64::try_from(n).map_or(Value::Float(n as f64), Value::Int),
        ValueRef::HugeInt(n) => i64::try_from(n).map_or(Value::Float(n as f64), Value::Int),
        ValueRef::Float(x) => Value::Float(x.into()),
        ValueRef::Double(x) => Value::Float(x),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Bytes(bytes.to_vec()),
        ValueRef::Date32(days) => NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
            .map_or(Value::Int(days.into()), Value::Date),
        ValueRef::Timestamp(unit, raw) => {
            let micros = match unit {
                TimeUnit::Second => raw.saturating_mul(1_000_000),
                TimeUnit::Millisecond => raw.saturating_mul(1_000),
                TimeUnit::Microsecond => raw,
                TimeUnit::Nanosecond => raw / 1_000,
            };
            let secs = micros.div_euclid(1_000_000);
            let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
            DateTime::from_timestamp(secs, nanos)
                .map_or(Value::Int(micros), |dt| Value::Timestamp(dt.naive_utc()))
        }
        other => Value::Text(format!("{:?}", DuckValue::from(other))),
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
