//! sw-core - Core library for sqlwrap
//!
//! Shared configuration, identifier helpers, target type names, SQL column
//! type descriptors, the type adapter and per-file scopes.

pub mod column_type;
pub mod config;
pub mod error;
pub mod ident;
pub mod scope;
pub mod type_adapter;
pub mod type_name;

pub use column_type::{ColumnType, TypeClass, TypeCode};
pub use config::{Config, Dialect};
pub use error::{CoreError, CoreResult};
pub use scope::Scope;
pub use type_adapter::{temporal_hook, AdapterHook, TypeAdapter};
pub use type_name::TypeName;
