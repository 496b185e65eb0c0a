//! Table declaration compiler.
//!
//! A definition is the body of a `CREATE TABLE` statement: a column and
//! constraint list. Foreign keys may name their target table bare
//! (`REFERENCES subject(subject_id)`); the bare name is resolved through a
//! [`DeclarationContext`] to the fully qualified table registered under it.

use crate::error::{SqlError, SqlResult};
use crate::parser::SqlParser;
use rk_core::FullTableName;
use sqlparser::ast::Statement;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::Token;
use std::collections::BTreeMap;

/// Tables a definition may reference, by bare name
#[derive(Debug, Clone, Default)]
pub struct DeclarationContext {
    tables: BTreeMap<String, FullTableName>,

    /// Catalog that created tables are qualified with
    catalog: Option<String>,
}

impl DeclarationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Qualify created tables with `catalog`
    pub fn in_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    pub fn catalog(&self) -> Option<&str> {
        self.catalog.as_deref()
    }

    /// Register a table under its bare name
    pub fn insert(&mut self, table: FullTableName) {
        self.tables.insert(table.table().to_string(), table);
    }

    pub fn get(&self, name: &str) -> Option<&FullTableName> {
        self.tables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FullTableName> {
        self.tables.values()
    }
}

impl FromIterator<FullTableName> for DeclarationContext {
    fn from_iter<I: IntoIterator<Item = FullTableName>>(iter: I) -> Self {
        let mut ctx = Self::new();
        for table in iter {
            ctx.insert(table);
        }
        ctx
    }
}

/// Compiles a table definition into DDL
pub trait DeclarationCompiler: Send + Sync {
    /// Produce the `CREATE TABLE` statement for `table` from `definition`
    fn declare(
        &self,
        table: &FullTableName,
        definition: &str,
        context: &DeclarationContext,
    ) -> SqlResult<String>;

    /// Tables the foreign keys of `definition` point at, without compiling it.
    ///
    /// Compilers that cannot tell return nothing.
    fn references(
        &self,
        _table: &FullTableName,
        _definition: &str,
        _context: &DeclarationContext,
    ) -> SqlResult<Vec<FullTableName>> {
        Ok(Vec::new())
    }
}

/// Declaration compiler for plain SQL column lists
#[derive(Default)]
pub struct SqlDeclarationCompiler {
    parser: SqlParser,
}

impl SqlDeclarationCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrite bare `REFERENCES` targets to qualified names. Returns the
    /// rewritten definition and every target, in order of appearance.
    ///
    /// A bare target naming the table being declared resolves to itself.
    fn resolve_references(
        &self,
        table: &FullTableName,
        definition: &str,
        context: &DeclarationContext,
    ) -> SqlResult<(String, Vec<FullTableName>)> {
        let tokens = self.parser.tokenize(definition)?;
        let mut out = String::with_capacity(definition.len());
        let mut targets = Vec::new();
        let mut awaiting_target = false;

        for (idx, token) in tokens.iter().enumerate() {
            match token {
                Token::Word(word) if word.keyword == Keyword::REFERENCES => {
                    awaiting_target = true;
                    out.push_str(&token.to_string());
                }
                Token::Word(word) if awaiting_target => {
                    awaiting_target = false;
                    if next_significant(&tokens, idx + 1) == Some(&Token::Period) {
                        // already qualified
                        targets.push(qualified_target(&tokens, idx, table)?);
                        out.push_str(&token.to_string());
                        continue;
                    }
                    let target = if word.value == table.table() {
                        table
                    } else {
                        context
                            .get(&word.value)
                            .ok_or_else(|| SqlError::UnresolvedReference {
                                name: word.value.clone(),
                                table: table.to_string(),
                            })?
                    };
                    out.push_str(&target.quoted());
                    targets.push(target.clone());
                }
                Token::Whitespace(_) => out.push_str(&token.to_string()),
                _ => {
                    awaiting_target = false;
                    out.push_str(&token.to_string());
                }
            }
        }
        Ok((out, targets))
    }
}

impl DeclarationCompiler for SqlDeclarationCompiler {
    fn declare(
        &self,
        table: &FullTableName,
        definition: &str,
        context: &DeclarationContext,
    ) -> SqlResult<String> {
        let definition = definition.trim();
        if definition.is_empty() {
            return Err(SqlError::EmptyDefinition {
                table: table.to_string(),
            });
        }

        let (body, _) = self.resolve_references(table, definition, context)?;
        let ddl = format!(
            "CREATE TABLE {} (\n{}\n)",
            table.qualified_in(context.catalog()),
            body
        );

        match self.parser.parse_single(&ddl)? {
            Statement::CreateTable(_) => {
                log::debug!("Compiled declaration of {table}");
                Ok(ddl)
            }
            other => Err(SqlError::UnsupportedStatement(format!(
                "definition of {table} does not compile to CREATE TABLE: {other}"
            ))),
        }
    }

    fn references(
        &self,
        table: &FullTableName,
        definition: &str,
        context: &DeclarationContext,
    ) -> SqlResult<Vec<FullTableName>> {
        let (_, targets) = self.resolve_references(table, definition.trim(), context)?;
        Ok(targets)
    }
}

/// First token at or after `from` that is not whitespace, with its index
fn next_significant_at(tokens: &[Token], from: usize) -> Option<(usize, &Token)> {
    tokens
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, t)| !matches!(t, Token::Whitespace(_)))
}

fn next_significant(tokens: &[Token], from: usize) -> Option<&Token> {
    next_significant_at(tokens, from).map(|(_, t)| t)
}

/// The dotted name starting at `start`; its last two parts name the table
fn qualified_target(
    tokens: &[Token],
    start: usize,
    table: &FullTableName,
) -> SqlResult<FullTableName> {
    let mut parts: Vec<&str> = Vec::new();
    let mut idx = start;
    while let Some(Token::Word(word)) = tokens.get(idx) {
        parts.push(&word.value);
        match next_significant_at(tokens, idx + 1) {
            Some((period, Token::Period)) => match next_significant_at(tokens, period + 1) {
                Some((next, Token::Word(_))) => idx = next,
                _ => break,
            },
            _ => break,
        }
    }

    let unresolved = || SqlError::UnresolvedReference {
        name: parts.join("."),
        table: table.to_string(),
    };
    match parts.as_slice() {
        [.., database, name] => FullTableName::new(*database, *name).map_err(|_| unresolved()),
        _ => Err(unresolved()),
    }
}

#[cfg(test)]
#[path = "declare_test.rs"]
mod tests;
