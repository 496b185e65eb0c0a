//! Shared dependency graph service.
//!
//! One [`DependencyGraph`] lives on each [`Connection`](crate::Connection) and
//! is shared by every relation bound to it. Mutations go through
//! [`ErdRequest`] messages so the validation in [`Erd`] always runs.

use crate::error::{RelResult, RelationError};
use rk_core::{Erd, ErdRequest, FullTableName};
use rk_db::{catalog, Database};
use std::sync::{Mutex, MutexGuard};

/// Thread-safe handle to the foreign-key graph
#[derive(Debug, Default)]
pub struct DependencyGraph {
    erd: Mutex<Erd>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RelResult<MutexGuard<'_, Erd>> {
        self.erd
            .lock()
            .map_err(|e| RelationError::GraphPoisoned(e.to_string()))
    }

    /// Apply one mutation request
    pub fn apply(&self, request: ErdRequest) -> RelResult<()> {
        self.lock()?.apply(request)?;
        Ok(())
    }

    /// Read the foreign keys of `table` from the catalog and replace its
    /// incoming edges with them.
    pub fn load_dependencies(&self, db: &dyn Database, table: &FullTableName) -> RelResult<()> {
        let edges = catalog::foreign_keys(db, table)?;
        log::debug!("{table} declares {} foreign key target(s)", edges.len());
        self.apply(ErdRequest::Load {
            table: table.clone(),
            edges,
        })
    }

    /// Reject references from `table` to `parents` that would be a self
    /// reference or close a cycle. The graph is not changed.
    pub fn check_references(
        &self,
        table: &FullTableName,
        parents: &[FullTableName],
    ) -> RelResult<()> {
        Ok(self.lock()?.check_references(table, parents)?)
    }

    /// Load every base table of `database`. Returns the number of tables.
    pub fn load_database(&self, db: &dyn Database, database: &str) -> RelResult<usize> {
        let tables = catalog::tables(db, database)?;
        for table in &tables {
            let name = FullTableName::new(database, table.as_str())?;
            self.load_dependencies(db, &name)?;
        }
        Ok(tables.len())
    }

    /// Forget a table and its edges
    pub fn clear_dependency(&self, table: &FullTableName) -> RelResult<()> {
        self.apply(ErdRequest::Clear {
            table: table.clone(),
        })
    }

    pub fn parents(&self, table: &FullTableName) -> RelResult<Vec<FullTableName>> {
        Ok(self.lock()?.parents(table))
    }

    pub fn children(&self, table: &FullTableName) -> RelResult<Vec<FullTableName>> {
        Ok(self.lock()?.children(table))
    }

    pub fn references(&self, table: &FullTableName) -> RelResult<Vec<FullTableName>> {
        Ok(self.lock()?.references(table))
    }

    pub fn referenced(&self, table: &FullTableName) -> RelResult<Vec<FullTableName>> {
        Ok(self.lock()?.referenced(table))
    }

    /// The table followed by its transitive dependents, ancestors first
    pub fn get_descendants(&self, table: &FullTableName) -> RelResult<Vec<FullTableName>> {
        Ok(self.lock()?.descendants(table))
    }

    pub fn contains(&self, table: &FullTableName) -> RelResult<bool> {
        Ok(self.lock()?.contains(table))
    }

    /// All known tables, ancestors first
    pub fn topological_order(&self) -> RelResult<Vec<FullTableName>> {
        Ok(self.lock()?.topological_order()?)
    }
}

#[cfg(test)]
#[path = "dependencies_test.rs"]
mod tests;
