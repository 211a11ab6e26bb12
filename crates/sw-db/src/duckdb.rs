//! DuckDB oracle

use crate::error::{DbError, DbResult};
use crate::oracle::{ResultField, SqlOracle, TableColumn, TableInfo};
use duckdb::{params, Connection};
use sqlparser::ast::Statement;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use sw_sql::SqlParser;

/// SQL oracle backed by an embedded DuckDB database
pub struct DuckDbOracle {
    conn: Mutex<Connection>,
    parser: SqlParser,
}

impl DuckDbOracle {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::with_connection(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::with_connection(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn with_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            parser: SqlParser::duckdb(),
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }
}

impl SqlOracle for DuckDbOracle {
    fn execute(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(sql, [])
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    fn parse(&self, sql: &str) -> DbResult<Vec<Statement>> {
        Ok(self.parser.parse(sql)?)
    }

    fn compile(&self, sql: &str) -> DbResult<Vec<ResultField>> {
        let conn = self.lock()?;
        let describe_failed = |e: duckdb::Error| DbError::DescribeFailed {
            sql: sql.to_string(),
            message: e.to_string(),
        };

        let mut stmt = conn
            .prepare(&format!("DESCRIBE {}", sql))
            .map_err(describe_failed)?;
        let fields = stmt
            .query_map([], |row| {
                Ok(ResultField {
                    name: row.get::<_, String>(0)?,
                    sql_type: row.get::<_, String>(1)?,
                    nullable: row
                        .get::<_, Option<String>>(2)?
                        .map_or(true, |null| null.eq_ignore_ascii_case("YES")),
                })
            })
            .map_err(describe_failed)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(describe_failed)?;

        log::debug!("described {} result fields", fields.len());
        Ok(fields)
    }

    fn table_columns(&self, schema: &str, table: &str) -> DbResult<Vec<TableColumn>> {
        let conn = self.lock()?;
        let primary_key = primary_key_columns(&conn, schema, table)?;

        let mut stmt = conn.prepare(
            "SELECT column_name, data_type, is_nullable, column_default \
             FROM information_schema.columns \
             WHERE table_schema = ? AND table_name = ? \
             ORDER BY ordinal_position",
        )?;
        let columns = stmt
            .query_map(params![schema, table], |row| {
                let name: String = row.get(0)?;
                let is_nullable: String = row.get(2)?;
                Ok(TableColumn {
                    primary_key: primary_key.contains(&name),
                    nullable: is_nullable.eq_ignore_ascii_case("YES"),
                    name,
                    sql_type: row.get(1)?,
                    default: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if columns.is_empty() {
            return Err(DbError::TableNotFound(format!("{}.{}", schema, table)));
        }
        Ok(columns)
    }

    fn list_tables(&self) -> DbResult<Vec<TableInfo>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT table_schema, table_name FROM information_schema.tables \
             WHERE table_type = 'BASE TABLE' \
             ORDER BY table_schema, table_name",
        )?;
        let tables = stmt
            .query_map([], |row| {
                Ok(TableInfo {
                    schema: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tables)
    }

    fn engine(&self) -> &'static str {
        "duckdb"
    }
}

fn primary_key_columns(conn: &Connection, schema: &str, table: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT unnest(constraint_column_names) FROM duckdb_constraints() \
         WHERE schema_name = ? AND table_name = ? AND constraint_type = 'PRIMARY KEY'",
    )?;
    let names = stmt
        .query_map(params![schema, table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
