//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use sw_core::Config;

use crate::cli::{GlobalArgs, LogLevel, SchemaArgs};

/// Initialize `env_logger`. `RUST_LOG` wins over the flags.
pub(crate) fn init_logging(global: &GlobalArgs) {
    let level = match (global.log_level, global.verbose) {
        (Some(level), _) => level_filter(level),
        (None, true) => LevelFilter::Debug,
        (None, false) => LevelFilter::Info,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

/// Load the project config from `--config` or the project directory.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<(Config, PathBuf)> {
    let root = PathBuf::from(&global.project_dir);
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path))
            .with_context(|| format!("Failed to load config {}", path))?,
        None => Config::load_from_dir(&root).context("Failed to load project config")?,
    };
    Ok((config, root))
}

/// Replace the configured DDL globs when any are given on the command line.
pub(crate) fn apply_schema_args(config: &mut Config, schema: &SchemaArgs) {
    if !schema.ddl.is_empty() {
        config.ddl = schema.ddl.clone();
    }
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}
