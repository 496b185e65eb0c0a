//! Relations: tables bound to a connection.
//!
//! A [`Relation`] names one table and carries its restrictions. Construction
//! does no I/O; the heading is read from the catalog on first use and cached
//! for the life of the value. Mutations (insert, delete, drop) synthesize SQL
//! from the heading and run it on the shared [`Connection`].

use crate::connection::Connection;
use crate::error::{RelResult, RelationError};
use crate::operand::{count_from, subquery_alias, Operand, Restriction};
use crate::prompt::Choice;
use rk_core::sql_utils::quote_ident_list;
use rk_core::{FullTableName, Heading, Record, Value};
use rk_db::catalog;
use std::borrow::Borrow;
use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

/// Heading reported for tables that do not exist
static EMPTY_HEADING: Heading = Heading::empty();

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// How an insert treats rows whose key already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertMode {
    /// Fail on a duplicate key
    #[default]
    Insert,
    /// Skip rows whose key already exists
    Ignore,
    /// Overwrite rows whose key already exists
    Replace,
}

impl InsertMode {
    /// Mode from the two legacy flags; `replace` wins when both are set
    pub fn from_flags(ignore_errors: bool, replace: bool) -> Self {
        match (ignore_errors, replace) {
            (_, true) => InsertMode::Replace,
            (true, false) => InsertMode::Ignore,
            (false, false) => InsertMode::Insert,
        }
    }

    fn command(self) -> &'static str {
        match self {
            InsertMode::Insert => "INSERT INTO",
            InsertMode::Ignore => "INSERT OR IGNORE INTO",
            InsertMode::Replace => "INSERT OR REPLACE INTO",
        }
    }
}

/// A table bound to a connection
#[derive(Clone)]
pub struct Relation {
    conn: Arc<Connection>,
    name: FullTableName,
    definition: Option<String>,
    heading: OnceCell<Heading>,
    restrictions: Vec<Restriction>,
}

impl Relation {
    /// A relation created from a table definition
    pub fn declared(
        conn: Arc<Connection>,
        name: FullTableName,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            definition: Some(definition.into()),
            ..Self::bind(conn, name)
        }
    }

    /// A relation over an existing table, with no definition
    pub fn bind(conn: Arc<Connection>, name: FullTableName) -> Self {
        Self {
            conn,
            name,
            definition: None,
            heading: OnceCell::new(),
            restrictions: Vec::new(),
        }
    }

    /// A relation over an existing table named `"db"."table"` or `db.table`
    pub fn free(conn: Arc<Connection>, name: &str) -> RelResult<Self> {
        Ok(Self::bind(conn, FullTableName::parse(name)?))
    }

    pub fn full_table_name(&self) -> &FullTableName {
        &self.name
    }

    /// The definition text, for declared relations
    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    /// The table's attributes.
    ///
    /// Loaded from the catalog on first call and cached. A table that does
    /// not exist has an empty heading, which is not cached.
    pub fn heading(&self) -> RelResult<&Heading> {
        if let Some(heading) = self.heading.get() {
            return Ok(heading);
        }
        let attributes = catalog::columns(self.conn.database(), &self.name)?;
        if attributes.is_empty() {
            return Ok(&EMPTY_HEADING);
        }
        log::debug!(
            "Loaded heading of {} ({} attributes)",
            self.name,
            attributes.len()
        );
        Ok(self.heading.get_or_init(|| Heading::new(attributes)))
    }

    /// Load the heading if it is not cached yet
    pub fn ensure_loaded(&self) -> RelResult<()> {
        self.heading().map(|_| ())
    }

    /// Whether the table currently exists. Never cached.
    pub fn is_declared(&self) -> RelResult<bool> {
        Ok(catalog::table_exists(self.conn.database(), &self.name)?)
    }

    /// Insert one record. Returns the number of rows written.
    ///
    /// Fields must all be attributes of the heading. Blob attributes are
    /// packed by the connection's codec and bound as parameters; other values
    /// are rendered as SQL literals. An empty record inserts a row of
    /// defaults.
    pub fn insert(&self, record: &Record, mode: InsertMode) -> RelResult<usize> {
        let heading = self.heading()?;
        if let Some(unknown) = record
            .field_names()
            .into_iter()
            .find(|field| !heading.contains(field))
        {
            return Err(RelationError::UnknownAttribute {
                attribute: unknown.to_string(),
                table: self.name.to_string(),
            });
        }

        let codec = self.conn.codec();
        let mut columns: Vec<&str> = Vec::new();
        let mut values: Vec<String> = Vec::new();
        let mut args: Vec<Value> = Vec::new();
        for attr in heading.iter() {
            let Some(value) = record.field_value(&attr.name) else {
                continue;
            };
            columns.push(&attr.name);
            if attr.is_blob {
                values.push("?".to_string());
                args.push(if value.is_null() {
                    Value::Null
                } else {
                    Value::Bytes(codec.pack(value)?)
                });
            } else {
                values.push(value.to_sql_literal());
            }
        }

        let sql = if columns.is_empty() {
            format!(
                "{} {} DEFAULT VALUES",
                mode.command(),
                self.conn.qualify(&self.name)
            )
        } else {
            format!(
                "{} {} ({}) VALUES ({})",
                mode.command(),
                self.conn.qualify(&self.name),
                quote_ident_list(columns),
                values.join(", ")
            )
        };
        log::info!("{sql}");
        Ok(self.conn.query(&sql, &args)?.rowcount())
    }

    /// Insert records one statement at a time.
    ///
    /// Rows inserted before a failing record stay inserted.
    pub fn iter_insert<I>(&self, records: I, mode: InsertMode) -> RelResult<usize>
    where
        I: IntoIterator,
        I::Item: Borrow<Record>,
    {
        records
            .into_iter()
            .try_fold(0, |total, record| Ok(total + self.insert(record.borrow(), mode)?))
    }

    /// Insert a slice of records, one statement each
    pub fn batch_insert(&self, records: &[Record], mode: InsertMode) -> RelResult<usize> {
        self.iter_insert(records, mode)
    }

    /// Delete the restricted rows without asking. Returns the rows deleted.
    pub fn delete_quick(&self) -> RelResult<usize> {
        let sql = format!(
            "DELETE FROM {}{}",
            self.conn.qualify(&self.name),
            self.where_clause()
        );
        log::info!("{sql}");
        Ok(self.conn.query(&sql, &[])?.rowcount())
    }

    /// Delete the restricted rows, asking first in safe mode.
    ///
    /// Returns the rows deleted, or `None` if the user declined. Rows in
    /// dependent tables are not deleted.
    pub fn delete(&self) -> RelResult<Option<usize>> {
        if self.conn.safe_mode() {
            let message = if self.restrictions.is_empty() {
                format!("Proceed to delete entire table {}?", self.name)
            } else {
                format!("Proceed to delete the matching rows of {}?", self.name)
            };
            if self.conn.prompt().ask(&message, Choice::No) != Choice::Yes {
                log::warn!("Delete from {} cancelled", self.name);
                return Ok(None);
            }
        }
        let deleted = self.delete_quick()?;
        log::debug!("Deleted {deleted} rows from {}", self.name);
        Ok(Some(deleted))
    }

    /// Drop the table if it exists, without asking. Returns whether a table
    /// was dropped.
    pub fn drop_quick(&self) -> RelResult<bool> {
        if !self.is_declared()? {
            log::warn!("Table {} is not declared, nothing to drop", self.name);
            return Ok(false);
        }
        self.conn
            .query(&format!("DROP TABLE {}", self.conn.qualify(&self.name)), &[])?;
        self.conn.dependencies().clear_dependency(&self.name)?;
        log::info!("Dropped table {}", self.name);
        Ok(true)
    }

    /// Drop the table and every declared table depending on it, dependents
    /// first. In safe mode the tables and their row counts are shown, the
    /// user is asked first and a confirmation is shown once they are gone.
    ///
    /// Returns `false` if the user declined. Not atomic: tables dropped before
    /// a failure stay dropped.
    pub fn drop(&self) -> RelResult<bool> {
        let mut relations = self.descendants()?;
        if relations.is_empty() {
            log::warn!("Table {} is not declared, nothing to drop", self.name);
            return Ok(true);
        }
        if self.conn.safe_mode() {
            let prompt = self.conn.prompt();
            prompt.show("The following tables are about to be dropped:");
            for relation in &relations {
                prompt.show(&format!(
                    "{} ({} tuples)",
                    relation.full_table_name(),
                    relation.count()?
                ));
            }
            if prompt.ask("Proceed?", Choice::No) != Choice::Yes {
                log::warn!("Drop of {} cancelled", self.name);
                return Ok(false);
            }
        }
        while let Some(relation) = relations.pop() {
            relation.drop_quick()?;
        }
        if self.conn.safe_mode() {
            self.conn.prompt().show("Tables dropped.");
        }
        Ok(true)
    }

    /// Size of the table's data and indexes in GiB
    pub fn size_on_disk(&self) -> RelResult<f64> {
        let status = catalog::table_status(self.conn.database(), &self.name)?.ok_or_else(|| {
            RelationError::NotDeclared {
                table: self.name.to_string(),
            }
        })?;
        Ok(status.total_bytes() as f64 / BYTES_PER_GIB)
    }

    pub fn parents(&self) -> RelResult<Vec<FullTableName>> {
        self.conn.dependencies().parents(&self.name)
    }

    pub fn children(&self) -> RelResult<Vec<FullTableName>> {
        self.conn.dependencies().children(&self.name)
    }

    pub fn references(&self) -> RelResult<Vec<FullTableName>> {
        self.conn.dependencies().references(&self.name)
    }

    pub fn referenced(&self) -> RelResult<Vec<FullTableName>> {
        self.conn.dependencies().referenced(&self.name)
    }

    /// This table and its declared dependents as free relations, ancestors
    /// first
    pub fn descendants(&self) -> RelResult<Vec<Relation>> {
        let names = self.conn.dependencies().get_descendants(&self.name)?;
        let mut relations = Vec::with_capacity(names.len());
        for name in names {
            let relation = Relation::bind(self.conn.clone(), name);
            if relation.is_declared()? {
                relations.push(relation);
            }
        }
        Ok(relations)
    }
}

impl Operand for Relation {
    fn connection(&self) -> &Arc<Connection> {
        &self.conn
    }

    fn heading(&self) -> RelResult<&Heading> {
        Relation::heading(self)
    }

    fn from_clause(&self) -> RelResult<String> {
        Ok(self.conn.qualify(&self.name))
    }

    fn restrictions(&self) -> &[Restriction] {
        &self.restrictions
    }

    fn describe(&self) -> String {
        self.name.to_string()
    }

    fn as_source(&self) -> RelResult<String> {
        if self.restrictions.is_empty() {
            Ok(self.conn.qualify(&self.name))
        } else {
            Ok(format!("({}) AS {}", self.sql()?, subquery_alias()))
        }
    }

    fn count(&self) -> RelResult<usize> {
        let sql = format!(
            "SELECT COUNT(*) FROM {}{}",
            self.conn.qualify(&self.name),
            self.where_clause()
        );
        count_from(&self.conn.query(&sql, &[])?)
    }

    fn restrict(&self, restriction: impl Into<Restriction>) -> Self {
        let mut restricted = self.clone();
        restricted.restrictions.push(restriction.into());
        restricted
    }
}

impl fmt::Debug for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relation")
            .field("name", &self.name)
            .field("restrictions", &self.restrictions)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "relation_test.rs"]
mod tests;
