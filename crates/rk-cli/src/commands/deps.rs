//! Deps command implementation

use anyhow::Result;
use rk_core::FullTableName;
use serde::Serialize;

use crate::cli::{DepsArgs, GlobalArgs, OutputFormat};
use crate::context::RuntimeContext;

/// Foreign-key neighbours of one table
#[derive(Debug, Serialize)]
struct Dependencies {
    table: String,
    parents: Vec<String>,
    children: Vec<String>,
    references: Vec<String>,
    referenced: Vec<String>,
}

/// Execute the deps command
pub fn execute(args: &DepsArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let relation = ctx.relation(&args.table.table)?;
    let deps = Dependencies {
        table: relation.full_table_name().to_string(),
        parents: names(relation.parents()?),
        children: names(relation.children()?),
        references: names(relation.references()?),
        referenced: names(relation.referenced()?),
    };

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&deps)?),
        OutputFormat::Text => print!("{}", format_dependencies(&deps)),
    }
    Ok(())
}

fn names(tables: Vec<FullTableName>) -> Vec<String> {
    tables.into_iter().map(|t| t.to_string()).collect()
}

fn format_dependencies(deps: &Dependencies) -> String {
    let mut out = format!("{}\n", deps.table);
    for (label, tables) in [
        ("parents", &deps.parents),
        ("children", &deps.children),
        ("references", &deps.references),
        ("referenced by", &deps.referenced),
    ] {
        if tables.is_empty() {
            out.push_str(&format!("  {label}: -\n"));
        } else {
            out.push_str(&format!("  {label}: {}\n", tables.join(", ")));
        }
    }
    out
}
