//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// sqlwrap - generate typed Go wrappers from annotated SQL
#[derive(Parser, Debug)]
#[command(name = "sqlwrap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Log levels accepted by `--log-level`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the Go package from DDL and annotated DML files
    Generate(GenerateArgs),

    /// Print the resolved statements of one DML file as JSON
    Describe(DescribeArgs),

    /// Print the tables of the loaded schema as JSON
    Tables(TablesArgs),
}

/// Schema inputs shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct SchemaArgs {
    /// DDL file glob, relative to the project directory (repeatable)
    #[arg(long = "ddl", value_name = "GLOB")]
    pub ddl: Vec<String>,
}

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// DML file glob, relative to the project directory (repeatable)
    #[arg(long = "dml", value_name = "GLOB")]
    pub dml: Vec<String>,

    /// Override output directory
    #[arg(short, long)]
    pub output_dir: Option<String>,
}

/// Arguments for the describe command
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// DML file to describe, relative to the project directory
    pub file: String,

    #[command(flatten)]
    pub schema: SchemaArgs,
}

/// Arguments for the tables command
#[derive(Args, Debug)]
pub struct TablesArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
