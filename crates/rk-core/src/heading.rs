//! Table headings: ordered attribute metadata.

use serde::{Deserialize, Serialize};

/// SQL type names whose values are opaque binary payloads.
const BLOB_TYPES: &[&str] = &["BLOB", "BYTEA", "BINARY", "VARBINARY"];

/// Metadata for one attribute (column) of a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub sql_type: String,
    pub is_blob: bool,
    pub nullable: bool,
    pub in_key: bool,
    pub default: Option<String>,
}

impl Attribute {
    /// A non-key, non-nullable attribute; the blob flag follows `sql_type`.
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        let sql_type = sql_type.into();
        Self {
            name: name.into(),
            is_blob: is_blob_type(&sql_type),
            sql_type,
            nullable: false,
            in_key: false,
            default: None,
        }
    }

    /// Mark the attribute as part of the primary key
    pub fn in_key(mut self) -> Self {
        self.in_key = true;
        self
    }

    /// Mark the attribute as nullable
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Set the column default expression
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Whether a SQL type name denotes a blob column.
///
/// Matches `BLOB` and its spellings (`LONGBLOB`, `bytea`, `VARBINARY(16)`).
pub fn is_blob_type(sql_type: &str) -> bool {
    let upper = sql_type.trim().to_ascii_uppercase();
    let base = upper.split('(').next().unwrap_or_default().trim();
    base.ends_with("BLOB") || BLOB_TYPES.contains(&base)
}

/// Ordered attribute metadata for one relation.
///
/// Order is the database's column order and is authoritative for SQL
/// synthesis. An empty heading means "not loaded" or "table absent".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    attributes: Vec<Attribute>,
}

impl Heading {
    /// The empty heading
    pub const fn empty() -> Self {
        Self {
            attributes: Vec::new(),
        }
    }

    /// Build a heading; later duplicates of a name are dropped.
    pub fn new(attributes: Vec<Attribute>) -> Self {
        let mut unique: Vec<Attribute> = Vec::with_capacity(attributes.len());
        for attr in attributes {
            if !unique.iter().any(|a| a.name == attr.name) {
                unique.push(attr);
            }
        }
        Self { attributes: unique }
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Look up an attribute by name
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Attributes in heading order
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    /// Attribute names in heading order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    /// Primary-key attribute names in heading order
    pub fn primary_key(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| a.in_key)
            .map(|a| a.name.as_str())
            .collect()
    }

    /// Non-key attribute names in heading order
    pub fn dependent_attributes(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| !a.in_key)
            .map(|a| a.name.as_str())
            .collect()
    }

    /// Names of blob attributes in heading order
    pub fn blobs(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| a.is_blob)
            .map(|a| a.name.as_str())
            .collect()
    }

    /// Heading of a natural join: this heading, then the other's attributes
    /// that are not already present.
    ///
    /// Shared attributes keep this side's metadata; an attribute is in the
    /// joined key if it is in either key.
    pub fn join(&self, other: &Heading) -> Heading {
        let mut attributes = self.attributes.clone();
        for attr in &mut attributes {
            if let Some(theirs) = other.get(&attr.name) {
                attr.in_key |= theirs.in_key;
            }
        }
        attributes.extend(
            other
                .attributes
                .iter()
                .filter(|a| !self.contains(&a.name))
                .cloned(),
        );
        Heading { attributes }
    }

    /// Consume the heading into its attributes
    pub fn into_attributes(self) -> Vec<Attribute> {
        self.attributes
    }
}

impl FromIterator<Attribute> for Heading {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        Heading::new(iter.into_iter().collect())
    }
}
