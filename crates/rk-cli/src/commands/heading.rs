//! Heading command implementation

use anyhow::{bail, Result};
use rk_core::Heading;

use crate::cli::{GlobalArgs, HeadingArgs, OutputFormat};
use crate::context::RuntimeContext;

/// Execute the heading command
pub fn execute(args: &HeadingArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let relation = ctx.relation(&args.table.table)?;
    let heading = relation.heading()?;
    if heading.is_empty() {
        bail!("Table {} is not declared", relation.full_table_name());
    }

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(heading)?),
        OutputFormat::Text => {
            println!("{}", relation.full_table_name());
            print!("{}", format_heading(heading));
        }
    }
    Ok(())
}

/// One line per attribute: key marker, name, type, then flags
pub(crate) fn format_heading(heading: &Heading) -> String {
    let width = heading.names().map(str::len).max().unwrap_or(0);
    let mut out = String::new();
    for attr in heading.iter() {
        let marker = if attr.in_key { "*" } else { " " };
        let mut line = format!("  {marker} {:<width$}  {}", attr.name, attr.sql_type);
        if attr.nullable {
            line.push_str("  NULL");
        }
        if let Some(default) = &attr.default {
            line.push_str(&format!("  DEFAULT {default}"));
        }
        if attr.is_blob {
            line.push_str("  (blob)");
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
