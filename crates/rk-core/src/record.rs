//! Insertable records and fetched rows.
//!
//! [`Record`] is the closed set of shapes that can be inserted into a
//! relation: a field-named mapping or a fixed-schema [`Row`]. Both expose the
//! same two capabilities, [`Record::field_names`] and [`Record::field_value`],
//! which is all SQL synthesis needs.

use crate::error::{CoreError, CoreResult};
use crate::value::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A fixed-schema row: positional values over a shared list of field names.
///
/// Rows fetched from one query share the same schema allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    fields: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Build a row, rejecting a value count that does not match the schema.
    pub fn new(fields: Arc<[String]>, values: Vec<Value>) -> CoreResult<Self> {
        if fields.len() != values.len() {
            return Err(CoreError::RowArity {
                fields: fields.len(),
                values: values.len(),
            });
        }
        Ok(Self { fields, values })
    }

    /// Field names in schema order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Values in schema order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Look up a value by field name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .position(|f| f == name)
            .map(|idx| &self.values[idx])
    }

    /// Iterate `(field, value)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Consume the row into a field-named mapping
    pub fn into_named(self) -> BTreeMap<String, Value> {
        self.fields.iter().cloned().zip(self.values).collect()
    }
}

/// A record handed to insert.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// Mapping from attribute name to value
    NamedFields(BTreeMap<String, Value>),
    /// Fixed-schema row whose field names are checked against the heading
    Row(Row),
}

impl Record {
    /// Build a field-named record from `(name, value)` pairs.
    pub fn named<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Record::NamedFields(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Field names present in the record
    pub fn field_names(&self) -> Vec<&str> {
        match self {
            Record::NamedFields(map) => map.keys().map(String::as_str).collect(),
            Record::Row(row) => row.fields().iter().map(String::as_str).collect(),
        }
    }

    /// Value of one field, if present
    pub fn field_value(&self, name: &str) -> Option<&Value> {
        match self {
            Record::NamedFields(map) => map.get(name),
            Record::Row(row) => row.get(name),
        }
    }

    /// Whether the record carries the given field
    pub fn contains(&self, name: &str) -> bool {
        self.field_value(name).is_some()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        match self {
            Record::NamedFields(map) => map.len(),
            Record::Row(row) => row.fields().len(),
        }
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Row> for Record {
    fn from(row: Row) -> Self {
        Record::Row(row)
    }
}

impl From<BTreeMap<String, Value>> for Record {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Record::NamedFields(map)
    }
}

impl TryFrom<serde_json::Value> for Record {
    type Error = CoreError;

    /// Only JSON objects with scalar members are records.
    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        let members = match json {
            serde_json::Value::Object(members) => members,
            other => {
                return Err(CoreError::UnsupportedRecordType {
                    found: json_kind(&other).to_string(),
                })
            }
        };
        let mut fields = BTreeMap::new();
        for (name, member) in members {
            let value =
                Value::from_json(&member).ok_or_else(|| CoreError::UnsupportedRecordType {
                    found: format!("object with {} member '{}'", json_kind(&member), name),
                })?;
            fields.insert(name, value);
        }
        Ok(Record::NamedFields(fields))
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
