//! Drop command implementation

use anyhow::{bail, Result};

use crate::cli::{GlobalArgs, TableArgs};
use crate::context::RuntimeContext;

/// Execute the drop command
pub fn execute(args: &TableArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let relation = ctx.relation(&args.table)?;
    if !relation.is_declared()? {
        bail!("Table {} is not declared", relation.full_table_name());
    }

    let tables = relation.descendants()?;
    for table in &tables {
        ctx.verbose(&format!("Will drop {}", table.full_table_name()));
    }
    if relation.drop()? {
        println!("Dropped {} table(s)", tables.len());
    } else {
        println!("Drop cancelled");
    }
    Ok(())
}
