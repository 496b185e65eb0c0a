//! Count command implementation

use anyhow::Result;
use rk_relation::Operand;

use crate::cli::{FilterArgs, GlobalArgs};
use crate::context::RuntimeContext;

/// Execute the count command
pub fn execute(args: &FilterArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let mut relation = ctx.relation(&args.table.table)?;
    if let Some(condition) = &args.condition {
        relation = relation.restrict(condition.as_str());
    }
    println!("{}", relation.count()?);
    Ok(())
}
