//! The SQL oracle: the engine that knows the schema and the shape of queries.

use crate::error::DbResult;
use serde::Serialize;
use sqlparser::ast::Statement;

/// One column of a query result as the engine describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultField {
    pub name: String,
    /// Engine type string, e.g. `VARCHAR` or `DECIMAL(10,2)`.
    pub sql_type: String,
    pub nullable: bool,
}

/// One column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub name: String,
    pub sql_type: String,
    pub nullable: bool,
    pub primary_key: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl TableColumn {
    /// Values come from a sequence when not given.
    pub fn is_auto_increment(&self) -> bool {
        self.default
            .as_deref()
            .is_some_and(|d| d.trim_start().to_ascii_lowercase().starts_with("nextval("))
    }
}

/// A table in the engine's catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TableInfo {
    pub schema: String,
    pub name: String,
}

/// Parsing, schema and result-shape queries answered by a SQL engine.
///
/// Generation runs against one oracle holding the loaded DDL; statements are
/// described, never executed for their results.
pub trait SqlOracle {
    /// Execute one statement, returning affected rows
    fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute several statements
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Parse SQL with the engine's dialect
    fn parse(&self, sql: &str) -> DbResult<Vec<Statement>>;

    /// Describe the result columns of a query without running it
    fn compile(&self, sql: &str) -> DbResult<Vec<ResultField>>;

    /// Columns of a table in declaration order
    fn table_columns(&self, schema: &str, table: &str) -> DbResult<Vec<TableColumn>>;

    /// All base tables, sorted by schema and name
    fn list_tables(&self) -> DbResult<Vec<TableInfo>>;

    /// Engine identifier for logging
    fn engine(&self) -> &'static str;
}
