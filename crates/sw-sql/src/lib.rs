//! sw-sql - SQL layer for sqlwrap
//!
//! Wraps sqlparser-rs with dialect selection and resolves what a SELECT's
//! projection refers to: the table references of its FROM clause and the
//! result fields each wildcard stands for.

pub mod dialect;
pub mod error;
pub mod parser;
pub mod table_refs;
pub mod wildcard;

pub use dialect::{DuckDbDialect, GenericDialect, MySqlDialect, SqlDialect};
pub use error::{SqlError, SqlResult};
pub use parser::SqlParser;
pub use table_refs::{
    leftmost_select, resolve_query_table_refs, resolve_table_refs, QualifiedTable, TableRef,
    TableRefKind, TableRefs,
};
pub use wildcard::{
    expand_wildcards, ref_columns_sql, rewrite_wildcards, ColumnRef, FieldList, FieldOrigin,
    WildcardSpan,
};
