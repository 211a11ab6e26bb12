//! sw-db - SQL oracle for sqlwrap
//!
//! This crate provides the `SqlOracle` trait and its DuckDB implementation,
//! which loads the DDL and describes tables and queries during generation.

pub mod duckdb;
pub mod error;
pub mod oracle;

pub use duckdb::DuckDbOracle;
pub use error::{DbError, DbResult};
pub use oracle::{ResultField, SqlOracle, TableColumn, TableInfo};
