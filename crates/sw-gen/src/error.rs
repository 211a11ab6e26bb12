//! Error types for sw-gen

use std::path::PathBuf;
use sw_annot::AnnotError;
use sw_core::CoreError;
use sw_db::DbError;
use sw_sql::SqlError;
use thiserror::Error;

/// Generation errors
#[derive(Error, Debug)]
pub enum GenError {
    /// File system error with path context (G001)
    #[error("[G001] Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid glob pattern (G002)
    #[error("[G002] Invalid file pattern {pattern:?}: {message}")]
    BadGlob { pattern: String, message: String },

    /// Statement kind with no wrapper template (G003)
    #[error("[G003] Unsupported statement: {kind} (only SELECT, INSERT, UPDATE and DELETE are wrapped)")]
    UnsupportedStatement { kind: String },

    /// A result or table column whose type cannot be mapped (G004)
    #[error("[G004] Column {column:?}: {source}")]
    ColumnType {
        column: String,
        #[source]
        source: CoreError,
    },

    /// Template loading or rendering failed (G005)
    #[error("[G005] Template {name:?} failed: {message}")]
    Template { name: String, message: String },

    /// Error inside one statement of a DML file (G006)
    #[error("[G006] {file}, statement {index}: {source}")]
    InStatement {
        file: PathBuf,
        index: usize,
        #[source]
        source: Box<GenError>,
    },

    /// Inconsistency between resolution steps (G007)
    #[error("[G007] Internal error (should not happen): {0}")]
    Internal(String),

    /// Two wrappers with the same function name (G008)
    #[error("[G008] Function {name} is defined in both {first} and {second}")]
    DuplicateFunction {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Two DML files map to the same output file (G009)
    #[error("[G009] Output file {name} would be written twice (again by {path})")]
    DuplicateOutput { name: String, path: PathBuf },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Annot(#[from] AnnotError),

    #[error(transparent)]
    Sql(#[from] SqlError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl GenError {
    /// True for errors that indicate a bug rather than bad input.
    pub fn is_internal(&self) -> bool {
        match self {
            GenError::Internal(_) => true,
            GenError::Sql(e) | GenError::Db(DbError::Sql(e)) => e.is_internal(),
            GenError::InStatement { source, .. } => source.is_internal(),
            _ => false,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for GenError
pub type GenResult<T> = Result<T, GenError>;
