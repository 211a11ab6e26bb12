//! Describe command implementation

use anyhow::{Context, Result};
use std::path::Path;
use sw_gen::Generator;

use crate::cli::{DescribeArgs, GlobalArgs};
use crate::commands::common::{apply_schema_args, load_config, print_json};

/// Execute the describe command
pub fn execute(args: &DescribeArgs, global: &GlobalArgs) -> Result<()> {
    let (mut config, root) = load_config(global)?;
    apply_schema_args(&mut config, &args.schema);

    let path = Path::new(&global.project_dir).join(&args.file);
    let mut generator = Generator::new(config, &root).context("Failed to set up generator")?;
    let dml = generator
        .describe(&path)
        .with_context(|| format!("Failed to describe {}", path.display()))?;
    print_json(&dml)
}
