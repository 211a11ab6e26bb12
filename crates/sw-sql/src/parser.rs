//! SQL parser wrapper

use crate::dialect::{DuckDbDialect, GenericDialect, MySqlDialect, SqlDialect};
use crate::error::{SqlError, SqlResult};
use sqlparser::ast::Statement;
use sw_core::Dialect;

/// SQL parser that wraps sqlparser-rs with dialect support
pub struct SqlParser {
    dialect: Box<dyn SqlDialect>,
}

impl SqlParser {
    /// Create a new parser with DuckDB dialect
    pub fn duckdb() -> Self {
        Self {
            dialect: Box::new(DuckDbDialect::new()),
        }
    }

    /// Create a new parser with MySQL dialect
    pub fn mysql() -> Self {
        Self {
            dialect: Box::new(MySqlDialect::new()),
        }
    }

    /// Create a new parser with the generic dialect
    pub fn generic() -> Self {
        Self {
            dialect: Box::new(GenericDialect::new()),
        }
    }

    /// Create a parser for a configured dialect
    pub fn for_dialect(dialect: Dialect) -> Self {
        match dialect {
            Dialect::DuckDb => Self::duckdb(),
            Dialect::MySql => Self::mysql(),
            Dialect::Generic => Self::generic(),
        }
    }

    /// Parse SQL into AST statements.
    ///
    /// The text is parsed as given (not trimmed) so that AST spans stay valid
    /// positions into it.
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        if sql.trim().is_empty() {
            return Err(SqlError::EmptySql);
        }

        self.dialect.parse(sql)
    }

    /// Parse SQL and return the first statement
    pub fn parse_single(&self, sql: &str) -> SqlResult<Statement> {
        let stmts = self.parse(sql)?;
        stmts.into_iter().next().ok_or(SqlError::EmptySql)
    }

    /// Get the dialect name
    pub fn dialect_name(&self) -> &'static str {
        self.dialect.name()
    }

    /// The dialect statements are parsed with
    pub fn dialect(&self) -> &dyn SqlDialect {
        self.dialect.as_ref()
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
