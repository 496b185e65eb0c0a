//! Relational operands and the algebra over them.
//!
//! An [`Operand`] is anything that renders to a `SELECT`: a table bound to a
//! [`Relation`](crate::Relation), or an [`Expression`] built from other
//! operands by projection, natural join or aggregation. Restrictions compose
//! onto either without touching the database; SQL runs only on `fetch`,
//! `fetch_one` and `count`.

use crate::connection::Connection;
use crate::error::{RelResult, RelationError};
use rk_core::sql_utils::{quote_ident, quote_ident_list};
use rk_core::{Attribute, Heading, Record, Row, Value};
use rk_db::{Cursor, DbError};
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static SUBQUERY_ALIASES: AtomicUsize = AtomicUsize::new(0);

/// Fresh alias for a derived table
pub(crate) fn subquery_alias() -> String {
    format!("_s{}", SUBQUERY_ALIASES.fetch_add(1, Ordering::Relaxed))
}

/// A condition limiting the rows of an operand
#[derive(Debug, Clone, PartialEq)]
pub enum Restriction {
    /// Raw SQL condition
    Sql(String),
    /// Conjunction of attribute equalities; a null value matches `IS NULL`
    Equals(Vec<(String, Value)>),
}

impl Restriction {
    /// Equality on the record's fields that are non-blob attributes of
    /// `heading`. Other fields are ignored.
    pub fn from_record(record: &Record, heading: &Heading) -> Self {
        let pairs = heading
            .iter()
            .filter(|attr| !attr.is_blob)
            .filter_map(|attr| {
                record
                    .field_value(&attr.name)
                    .map(|value| (attr.name.clone(), value.clone()))
            })
            .collect();
        Restriction::Equals(pairs)
    }

    /// The condition as SQL, or `None` if it restricts nothing
    pub fn to_sql(&self) -> Option<String> {
        match self {
            Restriction::Sql(condition) => {
                let condition = condition.trim();
                (!condition.is_empty()).then(|| condition.to_string())
            }
            Restriction::Equals(pairs) if pairs.is_empty() => None,
            Restriction::Equals(pairs) => Some(
                pairs
                    .iter()
                    .map(|(name, value)| {
                        if value.is_null() {
                            format!("{} IS NULL", quote_ident(name))
                        } else {
                            format!("{} = {}", quote_ident(name), value.to_sql_literal())
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" AND "),
            ),
        }
    }
}

impl From<&str> for Restriction {
    fn from(condition: &str) -> Self {
        Restriction::Sql(condition.to_string())
    }
}

impl From<String> for Restriction {
    fn from(condition: String) -> Self {
        Restriction::Sql(condition)
    }
}

/// ` WHERE (a) AND (b)`, or empty when nothing restricts
pub fn where_clause(restrictions: &[Restriction]) -> String {
    let conditions: Vec<String> = restrictions
        .iter()
        .filter_map(Restriction::to_sql)
        .map(|c| format!("({c})"))
        .collect();
    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    }
}

/// Something that renders to a `SELECT` over a connection
pub trait Operand {
    fn connection(&self) -> &Arc<Connection>;

    /// Attributes of the rows this operand yields
    fn heading(&self) -> RelResult<&Heading>;

    fn from_clause(&self) -> RelResult<String>;

    fn restrictions(&self) -> &[Restriction];

    /// Human-readable name used in errors
    fn describe(&self) -> String;

    fn where_clause(&self) -> String {
        where_clause(self.restrictions())
    }

    fn select_list(&self) -> RelResult<String> {
        let heading = self.heading()?;
        if heading.is_empty() {
            Ok("*".to_string())
        } else {
            Ok(quote_ident_list(heading.names()))
        }
    }

    /// The full `SELECT` statement
    fn sql(&self) -> RelResult<String> {
        Ok(format!(
            "SELECT {} FROM {}{}",
            self.select_list()?,
            self.from_clause()?,
            self.where_clause()
        ))
    }

    /// This operand as an item of another statement's `FROM`
    fn as_source(&self) -> RelResult<String> {
        Ok(format!("({}) AS {}", self.sql()?, subquery_alias()))
    }

    /// Every row, with blob attributes unpacked
    fn fetch(&self) -> RelResult<Vec<Row>> {
        let sql = self.sql()?;
        fetch_rows(self, &sql)
    }

    /// The first row, if any
    fn fetch_one(&self) -> RelResult<Option<Row>> {
        let sql = format!("{} LIMIT 1", self.sql()?);
        Ok(fetch_rows(self, &sql)?.into_iter().next())
    }

    /// Number of rows
    fn count(&self) -> RelResult<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.as_source()?);
        count_from(&self.connection().query(&sql, &[])?)
    }

    /// Copy of this operand with one more restriction
    fn restrict(&self, restriction: impl Into<Restriction>) -> Self
    where
        Self: Sized;

    /// Restrict to rows equal to the record on the attributes they share
    fn restrict_by(&self, record: &Record) -> RelResult<Self>
    where
        Self: Sized,
    {
        let restriction = Restriction::from_record(record, self.heading()?);
        Ok(self.restrict(restriction))
    }

    /// Keep `attributes` plus the primary key, renaming per `renames`
    /// (`(old, new)` pairs; renamed attributes are kept too).
    fn project(&self, attributes: &[&str], renames: &[(&str, &str)]) -> RelResult<Expression> {
        Expression::projection(self, attributes, renames)
    }

    /// Natural join on the attributes both sides share
    fn join(&self, other: &dyn Operand) -> RelResult<Expression> {
        Expression::natural_join(self, other)
    }

    /// Group by `group_by` and compute `(name, sql_expression)` aggregates
    fn aggregate(&self, group_by: &[&str], aggregates: &[(&str, &str)]) -> RelResult<Expression> {
        Expression::aggregation(self, group_by, aggregates)
    }
}

/// Parse the single integer a `COUNT(*)` returns
pub(crate) fn count_from(cursor: &Cursor) -> RelResult<usize> {
    cursor
        .fetch_one()
        .and_then(|row| row.first())
        .and_then(Value::as_i64)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| DbError::Catalog("COUNT(*) returned no count".to_string()).into())
}

fn fetch_rows<O: Operand + ?Sized>(operand: &O, sql: &str) -> RelResult<Vec<Row>> {
    let heading = operand.heading()?;
    let conn = operand.connection();
    let cursor = conn.query(sql, &[])?;

    let blob_columns: Vec<usize> = heading
        .blobs()
        .into_iter()
        .filter_map(|name| cursor.column_index(name))
        .collect();
    let fields: Arc<[String]> = cursor.columns().into();
    let codec = conn.codec();

    cursor
        .into_iter()
        .map(|mut values| -> RelResult<Row> {
            for &idx in &blob_columns {
                let unpacked = match &values[idx] {
                    Value::Bytes(payload) => Some(codec.unpack(payload)?),
                    _ => None,
                };
                if let Some(value) = unpacked {
                    values[idx] = value;
                }
            }
            Ok(Row::new(fields.clone(), values)?)
        })
        .collect()
}

fn require_attributes<O: Operand + ?Sized>(
    operand: &O,
    heading: &Heading,
    names: impl IntoIterator<Item = impl AsRef<str>>,
) -> RelResult<()> {
    for name in names {
        let name = name.as_ref();
        if !heading.contains(name) {
            return Err(RelationError::UnknownAttribute {
                attribute: name.to_string(),
                table: operand.describe(),
            });
        }
    }
    Ok(())
}

fn check_unique_names(heading_names: &[&str]) -> RelResult<()> {
    let mut seen = HashSet::new();
    for name in heading_names {
        if !seen.insert(*name) {
            return Err(RelationError::InvalidExpression(format!(
                "attribute '{name}' appears twice in the result"
            )));
        }
    }
    Ok(())
}

/// An operand derived from other operands
#[derive(Clone)]
pub struct Expression {
    conn: Arc<Connection>,
    heading: Heading,
    select: String,
    from: String,
    group_by: Option<String>,
    restrictions: Vec<Restriction>,
    /// Select list is plain attribute names, so restrictions can go in WHERE
    plain: bool,
}

impl Expression {
    fn projection<O: Operand + ?Sized>(
        source: &O,
        attributes: &[&str],
        renames: &[(&str, &str)],
    ) -> RelResult<Self> {
        let heading = source.heading()?;
        require_attributes(source, heading, attributes)?;
        require_attributes(source, heading, renames.iter().map(|(old, _)| *old))?;

        let mut attrs = Vec::new();
        let mut select = Vec::new();
        for attr in heading.iter() {
            let renamed = renames
                .iter()
                .find(|(old, _)| *old == attr.name)
                .map(|(_, new)| *new);
            if !(attr.in_key || renamed.is_some() || attributes.contains(&attr.name.as_str())) {
                continue;
            }
            match renamed {
                Some(new) => {
                    select.push(format!("{} AS {}", quote_ident(&attr.name), quote_ident(new)));
                    attrs.push(Attribute {
                        name: new.to_string(),
                        ..attr.clone()
                    });
                }
                None => {
                    select.push(quote_ident(&attr.name));
                    attrs.push(attr.clone());
                }
            }
        }
        check_unique_names(&attrs.iter().map(|a| a.name.as_str()).collect::<Vec<_>>())?;

        Ok(Self {
            conn: source.connection().clone(),
            heading: Heading::new(attrs),
            select: select.join(", "),
            from: source.as_source()?,
            group_by: None,
            restrictions: Vec::new(),
            plain: renames.is_empty(),
        })
    }

    fn natural_join<L: Operand + ?Sized, R: Operand + ?Sized>(left: &L, right: &R) -> RelResult<Self> {
        if !Arc::ptr_eq(left.connection(), right.connection()) {
            return Err(RelationError::InvalidExpression(format!(
                "cannot join {} and {} across connections",
                left.describe(),
                right.describe()
            )));
        }
        let (lh, rh) = (left.heading()?, right.heading()?);
        let shared = lh.names().any(|name| rh.contains(name));
        let keyword = if shared { "NATURAL JOIN" } else { "CROSS JOIN" };
        let heading = lh.join(rh);

        Ok(Self {
            conn: left.connection().clone(),
            select: quote_ident_list(heading.names()),
            from: format!("{} {keyword} {}", left.as_source()?, right.as_source()?),
            heading,
            group_by: None,
            restrictions: Vec::new(),
            plain: true,
        })
    }

    fn aggregation<O: Operand + ?Sized>(
        source: &O,
        group_by: &[&str],
        aggregates: &[(&str, &str)],
    ) -> RelResult<Self> {
        let heading = source.heading()?;
        require_attributes(source, heading, group_by)?;

        let mut attrs: Vec<Attribute> = Vec::new();
        let mut select: Vec<String> = Vec::new();
        for name in group_by {
            if let Some(attr) = heading.get(name) {
                attrs.push(Attribute {
                    in_key: true,
                    ..attr.clone()
                });
                select.push(quote_ident(name));
            }
        }
        for (name, expr) in aggregates {
            if name.is_empty() || expr.trim().is_empty() {
                return Err(RelationError::InvalidExpression(format!(
                    "aggregate '{name}' needs a name and an expression"
                )));
            }
            attrs.push(Attribute::new(*name, "ANY").nullable());
            select.push(format!("{} AS {}", expr.trim(), quote_ident(name)));
        }
        check_unique_names(&attrs.iter().map(|a| a.name.as_str()).collect::<Vec<_>>())?;

        Ok(Self {
            conn: source.connection().clone(),
            heading: Heading::new(attrs),
            select: select.join(", "),
            from: source.as_source()?,
            group_by: (!group_by.is_empty()).then(|| quote_ident_list(group_by.iter().copied())),
            restrictions: Vec::new(),
            plain: false,
        })
    }

    fn render(&self) -> String {
        let mut sql = format!(
            "SELECT {} FROM {}{}",
            self.select,
            self.from,
            where_clause(&self.restrictions)
        );
        if let Some(group_by) = &self.group_by {
            sql.push_str(" GROUP BY ");
            sql.push_str(group_by);
        }
        sql
    }
}

impl Operand for Expression {
    fn connection(&self) -> &Arc<Connection> {
        &self.conn
    }

    fn heading(&self) -> RelResult<&Heading> {
        Ok(&self.heading)
    }

    fn from_clause(&self) -> RelResult<String> {
        Ok(self.from.clone())
    }

    fn restrictions(&self) -> &[Restriction] {
        &self.restrictions
    }

    fn describe(&self) -> String {
        "expression".to_string()
    }

    fn select_list(&self) -> RelResult<String> {
        Ok(self.select.clone())
    }

    fn sql(&self) -> RelResult<String> {
        Ok(self.render())
    }

    fn restrict(&self, restriction: impl Into<Restriction>) -> Self {
        let mut restricted = if self.plain {
            self.clone()
        } else {
            // Renamed or aggregated attributes only exist outside this query.
            Self {
                conn: self.conn.clone(),
                heading: self.heading.clone(),
                select: quote_ident_list(self.heading.names()),
                from: format!("({}) AS {}", self.render(), subquery_alias()),
                group_by: None,
                restrictions: Vec::new(),
                plain: true,
            }
        };
        restricted.restrictions.push(restriction.into());
        restricted
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expression")
            .field("sql", &self.render())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "operand_test.rs"]
mod tests;
