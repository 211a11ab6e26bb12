//! sw-gen - Wrapper generation for sqlwrap
//!
//! Resolves annotated DML statements against a schema oracle into
//! descriptors and renders them, together with one file per table, into a
//! Go package.

pub mod descriptor;
pub mod error;
pub mod generator;
pub mod names;
pub mod render;

pub use descriptor::{
    ArgView, ColumnDescriptor, ColumnOrigin, DmlFile, ExecDescriptor, ExecKind, FuncView,
    ResultFieldDescriptor, ResultStruct, SelectDescriptor, StatementDescriptor, StructField,
    StructFieldKind, TableDescriptor, WildcardPosition,
};
pub use error::{GenError, GenResult};
pub use generator::{expand_globs, GenerateSummary, Generator, STANDALONE_FILE};
pub use names::{UniqueNames, NO_NAME_FIELD};
pub use render::{go_quote, write_file, Renderer, GENERATED_HEADER};
