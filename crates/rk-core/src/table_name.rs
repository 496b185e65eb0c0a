//! Fully-qualified table names.

use crate::error::{CoreError, CoreResult};
use crate::sql_utils::quote_ident;
use std::fmt;

/// A table identified by its database (DuckDB schema) and table name.
///
/// Displays as the quoted SQL identifier `"database"."table"`, which is also
/// the key used by the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FullTableName {
    database: String,
    table: String,
}

impl FullTableName {
    /// Create a new name, rejecting empty components.
    pub fn new(database: impl Into<String>, table: impl Into<String>) -> CoreResult<Self> {
        let database = database.into();
        let table = table.into();
        if database.is_empty() {
            return Err(CoreError::EmptyName {
                context: "database name".into(),
            });
        }
        if table.is_empty() {
            return Err(CoreError::EmptyName {
                context: "table name".into(),
            });
        }
        Ok(Self { database, table })
    }

    /// Parse `"database"."table"`, `` `database`.`table` `` or `database.table`.
    ///
    /// Quoted components may contain dots; doubled quote characters inside a
    /// quoted component stand for one literal quote.
    pub fn parse(name: &str) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidTableName {
            name: name.to_string(),
        };

        let mut parts: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut chars = name.trim().chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '"' | '`' if current.is_empty() => {
                    let quote = c;
                    loop {
                        match chars.next() {
                            Some(q) if q == quote => {
                                if chars.peek() == Some(&quote) {
                                    chars.next();
                                    current.push(quote);
                                } else {
                                    break;
                                }
                            }
                            Some(other) => current.push(other),
                            None => return Err(invalid()),
                        }
                    }
                    if !matches!(chars.peek(), None | Some('.')) {
                        return Err(invalid());
                    }
                }
                '.' => parts.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
        parts.push(current);

        match <[String; 2]>::try_from(parts) {
            Ok([database, table]) if !database.is_empty() && !table.is_empty() => {
                Ok(Self { database, table })
            }
            _ => Err(invalid()),
        }
    }

    /// Database (schema) component.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Table component.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Quoted SQL identifier, e.g. `"lab"."subject"`.
    pub fn quoted(&self) -> String {
        format!("{}.{}", quote_ident(&self.database), quote_ident(&self.table))
    }

    /// Quoted name prefixed with `catalog` when one is given, e.g.
    /// `"lab"."lab"."subject"` for a database file named after its schema.
    pub fn qualified_in(&self, catalog: Option<&str>) -> String {
        match catalog {
            Some(catalog) => format!("{}.{}", quote_ident(catalog), self.quoted()),
            None => self.quoted(),
        }
    }
}

impl fmt::Display for FullTableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.quoted())
    }
}

impl TryFrom<&str> for FullTableName {
    type Error = CoreError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}
