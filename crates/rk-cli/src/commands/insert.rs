//! Insert command implementation

use anyhow::{Context, Result};
use rk_core::Record;
use rk_relation::InsertMode;

use crate::cli::{GlobalArgs, InsertArgs};
use crate::context::RuntimeContext;

/// Execute the insert command
pub fn execute(args: &InsertArgs, global: &GlobalArgs) -> Result<()> {
    let records = parse_records(&args.records)?;
    let ctx = RuntimeContext::new(global)?;
    let relation = ctx.relation(&args.table.table)?;

    let mode = InsertMode::from_flags(args.ignore, args.replace);
    ctx.verbose(&format!("Inserting {} record(s) with {:?}", records.len(), mode));
    let inserted = relation
        .iter_insert(&records, mode)
        .with_context(|| format!("Failed to insert into {}", relation.full_table_name()))?;
    println!("Inserted {} row(s) into {}", inserted, relation.full_table_name());
    Ok(())
}

/// A JSON object is one record; an array holds one record per element
pub(crate) fn parse_records(text: &str) -> Result<Vec<Record>> {
    let json: serde_json::Value =
        serde_json::from_str(text).context("Records must be valid JSON")?;
    let items = match json {
        serde_json::Value::Array(items) => items,
        single => vec![single],
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| Record::try_from(item).with_context(|| format!("Invalid record #{}", i + 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rk_core::Value;

    #[test]
    fn test_parse_single_record() {
        let records = parse_records(r#"{"subject_id": 1, "species": "mouse"}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field_value("subject_id"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_parse_record_array() {
        let records = parse_records(r#"[{"subject_id": 1}, {"subject_id": 2}]"#).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_rejects_scalars() {
        let err = parse_records(r#"[{"subject_id": 1}, 7]"#).unwrap_err();
        assert!(err.to_string().contains("#2"));
        assert!(parse_records("not json").is_err());
    }
}
