//! Catalog lookups: schemas, tables, columns, keys and storage.
//!
//! Every function issues its queries through [`Database::query`], so they
//! work against any backend that exposes DuckDB's catalog views.

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use rk_core::sql_utils::{quote_ident, quote_literal};
use rk_core::{Attribute, DependencyKind, ForeignKeyEdge, FullTableName, Value};
use std::collections::{BTreeMap, HashSet};

/// Storage figures for one table, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStatus {
    pub data_length: u64,
    pub index_length: u64,
}

impl TableStatus {
    /// Data plus index bytes
    pub fn total_bytes(&self) -> u64 {
        self.data_length + self.index_length
    }
}

/// Check whether a database (DuckDB schema) exists
pub fn database_exists(db: &dyn Database, database: &str) -> DbResult<bool> {
    let cursor = db.query(
        "SELECT schema_name FROM information_schema.schemata WHERE schema_name = ?",
        &[Value::from(database)],
    )?;
    Ok(cursor.rowcount() > 0)
}

/// Create a database (DuckDB schema) in the backend's catalog
pub fn create_database(db: &dyn Database, database: &str) -> DbResult<()> {
    let sql = match db.catalog() {
        Some(catalog) => format!(
            "CREATE SCHEMA {}.{}",
            quote_ident(catalog),
            quote_ident(database)
        ),
        None => format!("CREATE SCHEMA {}", quote_ident(database)),
    };
    log::info!("{sql}");
    db.query(&sql, &[])?;
    Ok(())
}

/// Check whether a table exists
pub fn table_exists(db: &dyn Database, table: &FullTableName) -> DbResult<bool> {
    let cursor = db.query(
        "SELECT table_name FROM information_schema.tables \
         WHERE table_schema = ? AND table_name = ?",
        &[Value::from(table.database()), Value::from(table.table())],
    )?;
    Ok(cursor.rowcount() > 0)
}

/// Names of the base tables in a database, sorted
pub fn tables(db: &dyn Database, database: &str) -> DbResult<Vec<String>> {
    let cursor = db.query(
        "SELECT table_name FROM information_schema.tables \
         WHERE table_schema = ? AND table_type = 'BASE TABLE' \
         ORDER BY table_name",
        &[Value::from(database)],
    )?;
    cursor.iter().map(|row| text_at(row, 0)).collect()
}

/// Column metadata in declaration order, with primary-key membership.
///
/// A missing table yields an empty list.
pub fn columns(db: &dyn Database, table: &FullTableName) -> DbResult<Vec<Attribute>> {
    let cursor = db.query(
        "SELECT column_name, data_type, is_nullable, column_default \
         FROM information_schema.columns \
         WHERE table_schema = ? AND table_name = ? \
         ORDER BY ordinal_position",
        &[Value::from(table.database()), Value::from(table.table())],
    )?;
    if cursor.rowcount() == 0 {
        return Ok(Vec::new());
    }

    let key: HashSet<String> = primary_key(db, table)?.into_iter().collect();
    cursor
        .iter()
        .map(|row| {
            let name = text_at(row, 0)?;
            let sql_type = text_at(row, 1)?;
            let mut attr = Attribute::new(name, sql_type);
            if row.get(2).and_then(Value::as_str) == Some("YES") {
                attr = attr.nullable();
            }
            if let Some(default) = row.get(3).and_then(Value::as_str) {
                attr = attr.with_default(default);
            }
            if key.contains(&attr.name) {
                attr = attr.in_key();
            }
            Ok(attr)
        })
        .collect()
}

/// Primary-key column names of a table
pub fn primary_key(db: &dyn Database, table: &FullTableName) -> DbResult<Vec<String>> {
    Ok(constraint_rows(db, table)?
        .into_iter()
        .filter(|c| c.kind == ConstraintKind::PrimaryKey)
        .map(|c| c.column)
        .collect())
}

/// Outgoing foreign keys of a table, one edge per referenced table.
///
/// A foreign key whose columns all belong to the primary key is a
/// [`DependencyKind::Primary`] edge. Several foreign keys to the same table
/// collapse into one edge, primary if any of them is.
pub fn foreign_keys(db: &dyn Database, table: &FullTableName) -> DbResult<Vec<ForeignKeyEdge>> {
    let rows = constraint_rows(db, table)?;
    let key: HashSet<&str> = rows
        .iter()
        .filter(|c| c.kind == ConstraintKind::PrimaryKey)
        .map(|c| c.column.as_str())
        .collect();

    // constraint index -> (referenced table, all columns in key)
    let mut constraints: BTreeMap<i64, (String, bool)> = BTreeMap::new();
    for row in rows.iter().filter(|c| c.kind == ConstraintKind::ForeignKey) {
        let referenced = row.referenced.as_deref().ok_or_else(|| {
            DbError::Catalog(format!(
                "foreign key {} on {} has no referenced table",
                row.index, table
            ))
        })?;
        let entry = constraints
            .entry(row.index)
            .or_insert_with(|| (referenced.to_string(), true));
        entry.1 &= key.contains(row.column.as_str());
    }

    let mut edges: Vec<ForeignKeyEdge> = Vec::new();
    for (referenced, in_key) in constraints.into_values() {
        let referenced = FullTableName::new(table.database(), referenced)
            .map_err(|e| DbError::Catalog(e.to_string()))?;
        let kind = if in_key {
            DependencyKind::Primary
        } else {
            DependencyKind::Secondary
        };
        match edges.iter_mut().find(|e| e.referenced == referenced) {
            Some(existing) => {
                if kind == DependencyKind::Primary {
                    existing.kind = DependencyKind::Primary;
                }
            }
            None => edges.push(ForeignKeyEdge { referenced, kind }),
        }
    }
    Ok(edges)
}

/// Storage status of a table, or `None` when the table does not exist.
///
/// Data length counts the persistent blocks the table occupies. DuckDB keeps
/// no separate index accounting, so index length is always zero.
pub fn table_status(db: &dyn Database, table: &FullTableName) -> DbResult<Option<TableStatus>> {
    if !table_exists(db, table)? {
        return Ok(None);
    }

    let blocks = db.query(
        &format!(
            "SELECT COUNT(DISTINCT block_id) FROM pragma_storage_info({}) WHERE persistent",
            quote_literal(&table.qualified_in(db.catalog()))
        ),
        &[],
    )?;
    let blocks = int_at(blocks.fetch_one(), 0);

    let block_size = db.query(
        "SELECT block_size FROM pragma_database_size() \
         WHERE database_name = current_database()",
        &[],
    )?;
    let block_size = int_at(block_size.fetch_one(), 0);

    Ok(Some(TableStatus {
        data_length: blocks.saturating_mul(block_size),
        index_length: 0,
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConstraintKind {
    PrimaryKey,
    ForeignKey,
}

/// One (constraint, column) pair from `duckdb_constraints()`
#[derive(Debug)]
struct ConstraintColumn {
    index: i64,
    kind: ConstraintKind,
    column: String,
    referenced: Option<String>,
}

fn constraint_rows(db: &dyn Database, table: &FullTableName) -> DbResult<Vec<ConstraintColumn>> {
    let cursor = db.query(
        "SELECT constraint_index, constraint_type, \
                unnest(constraint_column_names) AS column_name, referenced_table \
         FROM duckdb_constraints() \
         WHERE schema_name = ? AND table_name = ? \
           AND constraint_type IN ('PRIMARY KEY', 'FOREIGN KEY')",
        &[Value::from(table.database()), Value::from(table.table())],
    )?;

    cursor
        .iter()
        .map(|row| {
            let index = row.first().and_then(Value::as_i64).ok_or_else(|| {
                DbError::Catalog(format!("constraint without index on {table}"))
            })?;
            let kind = match text_at(row, 1)?.as_str() {
                "PRIMARY KEY" => ConstraintKind::PrimaryKey,
                _ => ConstraintKind::ForeignKey,
            };
            Ok(ConstraintColumn {
                index,
                kind,
                column: text_at(row, 2)?,
                referenced: row.get(3).and_then(Value::as_str).map(str::to_string),
            })
        })
        .collect()
}

fn text_at(row: &[Value], idx: usize) -> DbResult<String> {
    row.get(idx)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| DbError::Catalog(format!("expected text in column {idx}")))
}

fn int_at(row: Option<&[Value]>, idx: usize) -> u64 {
    row.and_then(|r| r.get(idx))
        .and_then(Value::as_i64)
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
