//! sw-annot - Annotation layer for sqlwrap
//!
//! Scans SQL comments, parses the annotation DSL they carry and assembles
//! annotated statements into wrapper descriptors.

pub mod annotation;
pub mod assembler;
pub mod comment;
pub mod error;

pub use annotation::{
    Annotation, AnnotationBuilder, AnnotationRegistry, ArgAnnotation, BindAnnotation,
    FuncAnnotation, ReturnStyle, SettingAnnotation, SubsAnnotation,
};
pub use assembler::{Assembler, WrapperDescriptor};
pub use comment::{
    blank_comments, engine_text, scan_annotated, scan_comments, split_statements, Comment,
};
pub use error::{AnnotError, AnnotResult};
