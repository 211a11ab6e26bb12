//! Configuration types and parsing for sqlwrap.yml

use crate::error::{CoreError, CoreResult};
use crate::ident::is_ident;
use crate::type_adapter::{temporal_hook, TypeAdapter};
use crate::type_name::TypeName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Config file names looked up in a project directory, in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["sqlwrap.yml", "sqlwrap.yaml"];

/// Generator configuration from sqlwrap.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Glob patterns of DDL files, loaded in sorted order
    #[serde(default = "default_ddl")]
    pub ddl: Vec<String>,

    /// Glob patterns of annotated DML files
    #[serde(default = "default_dml")]
    pub dml: Vec<String>,

    /// Output directory; its last component names the package by default
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Explicit package name for generated files
    #[serde(default)]
    pub package: Option<String>,

    /// SQL dialect used to parse statements
    #[serde(default)]
    pub dialect: Dialect,

    /// Schema whose name is omitted from table references
    #[serde(default = "default_schema")]
    pub default_schema: String,

    /// Prefix of named placeholders emitted for bind annotations
    #[serde(default = "default_bind_name_prefix")]
    pub bind_name_prefix: String,

    /// Comment prefix marking an annotation
    #[serde(default = "default_annotation_marker")]
    pub annotation_marker: String,

    /// Map DATE/DATETIME/TIMESTAMP to time types instead of strings
    #[serde(default = "default_true")]
    pub use_null_time: bool,

    /// SQL base type name -> target type spec
    #[serde(default)]
    pub type_overrides: BTreeMap<String, String>,

    /// Directories holding `<template>.go.j2` overrides; later entries win
    #[serde(default)]
    pub template_dirs: Vec<String>,
}

/// SQL dialect selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    DuckDb,
    MySql,
    Generic,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::DuckDb => write!(f, "duckdb"),
            Dialect::MySql => write!(f, "mysql"),
            Dialect::Generic => write!(f, "generic"),
        }
    }
}

fn default_ddl() -> Vec<String> {
    vec!["ddl/*.sql".to_string()]
}

fn default_dml() -> Vec<String> {
    vec!["dml/*.sql".to_string()]
}

fn default_output_dir() -> String {
    "generated".to_string()
}

fn default_schema() -> String {
    "main".to_string()
}

fn default_bind_name_prefix() -> String {
    ":".to_string()
}

fn default_annotation_marker() -> String {
    "$".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ddl: default_ddl(),
            dml: default_dml(),
            output_dir: default_output_dir(),
            package: None,
            dialect: Dialect::default(),
            default_schema: default_schema(),
            bind_name_prefix: default_bind_name_prefix(),
            annotation_marker: default_annotation_marker(),
            use_null_time: true,
            type_overrides: BTreeMap::new(),
            template_dirs: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory.
    ///
    /// The config file is optional: without one the defaults apply.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        log::debug!("no config file in {}, using defaults", dir.display());
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        let invalid = |message: String| Err(CoreError::ConfigInvalid { message });

        if self.default_schema.is_empty() {
            return invalid("default_schema cannot be empty".to_string());
        }
        if self.bind_name_prefix.is_empty() {
            return invalid("bind_name_prefix cannot be empty".to_string());
        }
        if self.annotation_marker.is_empty()
            || self.annotation_marker.chars().any(char::is_whitespace)
        {
            return invalid(format!(
                "annotation_marker must be non-empty without whitespace, got {:?}",
                self.annotation_marker
            ));
        }
        for (sql_type, spec) in &self.type_overrides {
            if sql_type.trim().is_empty() {
                return invalid("type_overrides contains an empty SQL type".to_string());
            }
            TypeName::from_spec(spec)?;
        }
        self.package_name()?;
        Ok(())
    }

    /// Name of the generated package: `package`, else the last component of
    /// `output_dir`. Must be an identifier.
    pub fn package_name(&self) -> CoreResult<String> {
        let name = match &self.package {
            Some(package) => package.clone(),
            None => Path::new(&self.output_dir)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        if !is_ident(&name) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "package name {:?} is not an identifier (set `package` or rename output_dir)",
                    name
                ),
            });
        }
        Ok(name)
    }

    /// Output directory resolved against a project root
    pub fn output_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.output_dir)
    }

    /// Template directories resolved against a project root
    pub fn template_dirs_absolute(&self, root: &Path) -> Vec<PathBuf> {
        self.template_dirs.iter().map(|d| root.join(d)).collect()
    }

    /// Build the type adapter described by this config: the temporal hook
    /// (when enabled) followed by one hook per type override.
    pub fn type_adapter(&self) -> CoreResult<TypeAdapter> {
        let mut adapter = TypeAdapter::new();
        if self.use_null_time {
            adapter.add_hook(temporal_hook());
        }
        for (sql_type, spec) in &self.type_overrides {
            adapter.add_override(sql_type, TypeName::from_spec(spec)?);
        }
        Ok(adapter)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
