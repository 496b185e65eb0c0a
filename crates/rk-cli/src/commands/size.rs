//! Size command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, TableArgs};
use crate::context::RuntimeContext;

/// Execute the size command
pub fn execute(args: &TableArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let relation = ctx.relation(&args.table)?;
    let gib = relation
        .size_on_disk()
        .with_context(|| format!("Failed to read size of {}", relation.full_table_name()))?;
    println!("{}: {:.6} GiB", relation.full_table_name(), gib);
    Ok(())
}
