//! SQL dialect seam.
//!
//! Declarations are parsed and tokenized through a [`SqlDialect`] so the
//! grammar in use is chosen in one place. Only DuckDB is provided.

use sqlparser::ast::Statement;
use sqlparser::dialect::{Dialect, DuckDbDialect as DuckDbGrammar};
use sqlparser::parser::{Parser, ParserError};
use sqlparser::tokenizer::{Token, Tokenizer};

use crate::error::{SqlError, SqlResult};

static DUCKDB: DuckDbGrammar = DuckDbGrammar {};

/// A SQL grammar plus its identifier quoting
pub trait SqlDialect: Send + Sync {
    /// Grammar handed to sqlparser
    fn parser_dialect(&self) -> &dyn Dialect;

    fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        Parser::parse_sql(self.parser_dialect(), sql).map_err(located)
    }

    /// Split SQL into tokens, whitespace and comments included
    fn tokenize(&self, sql: &str) -> SqlResult<Vec<Token>> {
        Tokenizer::new(self.parser_dialect(), sql)
            .tokenize()
            .map_err(|e| SqlError::TokenizeError(e.to_string()))
    }

    fn quote_ident(&self, ident: &str) -> String;

    fn name(&self) -> &'static str;
}

fn located(err: ParserError) -> SqlError {
    let message = err.to_string();
    let (line, column) = error_location(&message).unwrap_or_default();
    SqlError::ParseError {
        message,
        line,
        column,
    }
}

/// Line and column from the `Line: N, Column: M` suffix sqlparser appends
/// to its messages; `ParserError` has no structured location.
fn error_location(message: &str) -> Option<(usize, usize)> {
    let (_, tail) = message.rsplit_once("Line: ")?;
    let (line, tail) = tail.split_once(", Column: ")?;
    let digits = tail
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(tail.len());
    Some((line.trim().parse().ok()?, tail[..digits].parse().ok()?))
}

/// The DuckDB grammar, quoting identifiers with double quotes
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDbDialect;

impl DuckDbDialect {
    pub const fn new() -> Self {
        DuckDbDialect
    }
}

impl SqlDialect for DuckDbDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &DUCKDB
    }

    fn quote_ident(&self, ident: &str) -> String {
        rk_core::sql_utils::quote_ident(ident)
    }

    fn name(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
