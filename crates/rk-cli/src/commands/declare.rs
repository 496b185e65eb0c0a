//! Declare command implementation

use anyhow::{Context, Result};
use rk_core::{FullTableName, SchemaFile};
use rk_db::catalog;
use rk_relation::Schema;
use rk_sql::DeclarationContext;
use std::path::Path;

use crate::cli::{DeclareArgs, GlobalArgs};
use crate::context::RuntimeContext;

/// Execute the declare command
pub fn execute(args: &DeclareArgs, global: &GlobalArgs) -> Result<()> {
    let file = SchemaFile::load(Path::new(&args.file))
        .with_context(|| format!("Failed to load schema file: {}", args.file))?;
    let ctx = RuntimeContext::new(global)?;
    let database = file
        .database
        .clone()
        .unwrap_or_else(|| ctx.config.schema.clone());

    // Tables already in the database can be referenced by bare name.
    let existing = catalog::tables(ctx.conn.database(), &database)?;
    let context = existing
        .iter()
        .map(|table| FullTableName::new(database.as_str(), table.as_str()))
        .collect::<Result<DeclarationContext, _>>()?;

    let mut schema = Schema::new(database.as_str(), context, ctx.conn.clone())
        .with_context(|| format!("Failed to open database {database}"))?;
    schema.load_dependencies()?;

    for spec in &file.tables {
        let known = existing.contains(&spec.name);
        let relation = schema
            .register(spec)
            .with_context(|| format!("Failed to declare {}.{}", database, spec.name))?;
        if known {
            println!("  Exists:   {}", relation.full_table_name());
        } else {
            println!("  Declared: {}", relation.full_table_name());
        }
    }
    println!();
    println!("{} table(s) in {}", file.tables.len(), database);
    Ok(())
}
