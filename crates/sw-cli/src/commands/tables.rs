//! Tables command implementation

use anyhow::{Context, Result};
use sw_gen::Generator;

use crate::cli::{GlobalArgs, TablesArgs};
use crate::commands::common::{apply_schema_args, load_config, print_json};

/// Execute the tables command
pub fn execute(args: &TablesArgs, global: &GlobalArgs) -> Result<()> {
    let (mut config, root) = load_config(global)?;
    apply_schema_args(&mut config, &args.schema);

    let mut generator = Generator::new(config, &root).context("Failed to set up generator")?;
    let files = generator.load_schema().context("Failed to load schema")?;
    log::debug!("loaded {} DDL files", files.len());
    let tables = generator.tables().context("Failed to read tables")?;
    print_json(&tables)
}
