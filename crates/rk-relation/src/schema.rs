//! Schemas: a database plus the tables declared in it.

use crate::connection::Connection;
use crate::error::{RelResult, RelationError};
use crate::relation::Relation;
use rk_core::{FullTableName, SchemaFile, TableSpec};
use rk_db::catalog;
use rk_sql::{DeclarationCompiler, DeclarationContext, SqlDeclarationCompiler};
use std::sync::Arc;

/// Declares tables into one database
pub struct Schema {
    database: String,
    context: DeclarationContext,
    conn: Arc<Connection>,
    compiler: Box<dyn DeclarationCompiler>,
}

impl Schema {
    /// Bind to `database`, creating it if it does not exist.
    ///
    /// `context` lists tables that definitions may reference by bare name.
    pub fn new(
        database: impl Into<String>,
        context: DeclarationContext,
        conn: Arc<Connection>,
    ) -> RelResult<Self> {
        let database = database.into();
        if !catalog::database_exists(conn.database(), &database)? {
            log::info!("Database {database} not found, creating it");
            catalog::create_database(conn.database(), &database).map_err(|source| {
                RelationError::DatabaseCreationFailed {
                    database: database.clone(),
                    source,
                }
            })?;
        }
        let context = match conn.database().catalog() {
            Some(catalog) => context.in_catalog(catalog),
            None => context,
        };
        Ok(Self {
            database,
            context,
            conn,
            compiler: Box::new(SqlDeclarationCompiler::new()),
        })
    }

    /// Use a different declaration compiler
    pub fn with_compiler(mut self, compiler: Box<dyn DeclarationCompiler>) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn context(&self) -> &DeclarationContext {
        &self.context
    }

    pub fn connection(&self) -> &Arc<Connection> {
        &self.conn
    }

    /// Declare one table and return it bound to this schema's connection.
    ///
    /// The table is created only if it does not exist yet. Its foreign keys
    /// are then loaded into the dependency graph and its name added to the
    /// context so later definitions can reference it.
    ///
    /// Foreign keys that would make the table reference itself, directly or
    /// through a cycle, are rejected before anything is created. If the
    /// created table still cannot enter the graph it is dropped again.
    pub fn register(&mut self, spec: &TableSpec) -> RelResult<Relation> {
        let name = FullTableName::new(self.database.as_str(), spec.name.as_str())?;
        let relation =
            Relation::declared(self.conn.clone(), name.clone(), spec.definition.as_str());

        if relation.heading()?.is_empty() {
            let targets = self
                .compiler
                .references(&name, &spec.definition, &self.context)?;
            self.conn.dependencies().check_references(&name, &targets)?;

            let ddl = self
                .compiler
                .declare(&name, &spec.definition, &self.context)?;
            log::info!("{ddl}");
            self.conn.query(&ddl, &[])?;

            if let Err(e) = self
                .conn
                .dependencies()
                .load_dependencies(self.conn.database(), &name)
            {
                log::warn!("Dropping {name}: its foreign keys were rejected");
                self.conn
                    .query(&format!("DROP TABLE {}", self.conn.qualify(&name)), &[])?;
                return Err(e);
            }
        } else {
            log::debug!("Table {name} already declared");
            self.conn
                .dependencies()
                .load_dependencies(self.conn.database(), &name)?;
        }

        self.context.insert(name);
        Ok(relation)
    }

    /// Register every table of a schema file, in file order
    pub fn register_all(&mut self, file: &SchemaFile) -> RelResult<Vec<Relation>> {
        file.validate()?;
        file.tables.iter().map(|spec| self.register(spec)).collect()
    }

    /// A free relation over a table of this database
    pub fn relation(&self, table: &str) -> RelResult<Relation> {
        Ok(Relation::bind(
            self.conn.clone(),
            FullTableName::new(self.database.as_str(), table)?,
        ))
    }

    /// Load the dependency graph for every table already in the database
    pub fn load_dependencies(&self) -> RelResult<usize> {
        self.conn
            .dependencies()
            .load_database(self.conn.database(), &self.database)
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
