//! Error types for sw-sql

use thiserror::Error;

/// SQL parsing and resolution errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// SQL parse error (S001)
    #[error("[S001] SQL parse error at line {line}, column {column}: {message}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    /// Empty SQL (S002)
    #[error("[S002] SQL is empty")]
    EmptySql,

    /// Unsupported SQL statement (S003)
    #[error("[S003] Unsupported SQL statement type: {0}")]
    UnsupportedStatement(String),

    /// Two FROM sources share a reference name (S005)
    #[error("[S005] Duplicate table reference name {name:?}: give each source in FROM a distinct alias")]
    DuplicateTableRef { name: String },

    /// FROM source other than a table or aliased subquery (S006)
    #[error("[S006] Unsupported table source: {0}")]
    UnsupportedTableSource(String),

    /// Wildcard with column-changing options such as EXCLUDE or REPLACE (S007)
    #[error("[S007] Unsupported wildcard: {0}")]
    UnsupportedWildcard(String),

    /// Inconsistency in resolution logic (S008)
    #[error("[S008] Internal error (should not happen): {0}")]
    Internal(String),

    /// Unqualified wildcard over a join that merges columns (S009)
    #[error("[S009] Wildcard {0} over a USING or NATURAL join: qualify it as t.* or list the columns")]
    WildcardOverMergedJoin(String),
}

impl SqlError {
    /// True for errors that indicate a bug rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, SqlError::Internal(_))
    }
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
