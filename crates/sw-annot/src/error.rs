//! Error types for sw-annot

use sw_core::CoreError;
use thiserror::Error;

/// Comment scanning, annotation parsing and assembly errors
#[derive(Error, Debug)]
pub enum AnnotError {
    /// Unterminated block comment (A001)
    #[error("[A001] Missing '*/' for comment starting at offset {offset}")]
    MissingBlockEnd { offset: usize },

    /// Unterminated string literal (A002)
    #[error("[A002] Bad string literal starting at offset {offset}")]
    BadStringLiteral { offset: usize },

    /// Malformed key/value syntax (A003)
    #[error("[A003] Illegal annotation format near: {near:?}")]
    IllegalFormat { near: String },

    /// Primary key not registered (A004)
    #[error("[A004] Unknown annotation: {key:?}")]
    UnknownAnnotation { key: String },

    /// Annotation-specific value or option error (A005)
    #[error("[A005] {annotation}: {message}")]
    InvalidValue {
        annotation: &'static str,
        message: String,
    },

    /// Bind annotation without a following comment (A006)
    #[error("[A006] bind: {bind:?} missing enclosure")]
    MissingEnclosure { bind: String },

    /// Annotation key registered twice (A007)
    #[error("[A007] Annotation {key:?} is already registered")]
    DuplicateRegistration { key: String },

    /// More than one func annotation in a statement (A008)
    #[error("[A008] func: statement declares both {first:?} and {second:?}")]
    DuplicateFunc { first: String, second: String },

    /// Error from sw-core (type specs)
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl AnnotError {
    pub(crate) fn invalid(annotation: &'static str, message: impl Into<String>) -> Self {
        AnnotError::InvalidValue {
            annotation,
            message: message.into(),
        }
    }
}

/// Result type alias for AnnotError
pub type AnnotResult<T> = Result<T, AnnotError>;
