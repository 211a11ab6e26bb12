//! Error types for sw-core

use thiserror::Error;

/// Core error type for sqlwrap
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Invalid configuration value
    #[error("[C002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C003: Column type string could not be understood
    #[error("[C003] Cannot parse column type '{type_name}'")]
    BadColumnType { type_name: String },

    /// C004: No target type for a column type
    #[error("[C004] Unsupported column type '{type_name}': add a type override to map it")]
    UnsupportedType { type_name: String },

    /// C005: Malformed type name spec
    #[error("[C005] Invalid type name spec '{spec}': {reason}")]
    BadTypeSpec { spec: String, reason: String },

    /// C006: IO error with file path context
    #[error("[C006] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C007: YAML parse error
    #[error("[C007] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
