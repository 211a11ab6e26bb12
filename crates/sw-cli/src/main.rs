//! sqlwrap CLI - generate typed Go wrappers from annotated SQL

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{common, describe, generate, tables};

fn main() -> Result<()> {
    let cli = Cli::parse();
    common::init_logging(&cli.global);

    match &cli.command {
        cli::Commands::Generate(args) => generate::execute(args, &cli.global),
        cli::Commands::Describe(args) => describe::execute(args, &cli.global),
        cli::Commands::Tables(args) => tables::execute(args, &cli.global),
    }
}
