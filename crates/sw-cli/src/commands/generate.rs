//! Generate command implementation

use anyhow::{Context, Result};
use sw_gen::Generator;

use crate::cli::{GenerateArgs, GlobalArgs};
use crate::commands::common::{apply_schema_args, load_config};

/// Execute the generate command
pub fn execute(args: &GenerateArgs, global: &GlobalArgs) -> Result<()> {
    let (mut config, root) = load_config(global)?;
    apply_schema_args(&mut config, &args.schema);
    if !args.dml.is_empty() {
        config.dml = args.dml.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }

    let mut generator = Generator::new(config, &root).context("Failed to set up generator")?;
    let summary = generator.generate().context("Generation failed")?;

    for file in &summary.files {
        println!("  {}", file.display());
    }
    println!(
        "Generated {} files ({} tables, {} statements)",
        summary.files.len(),
        summary.tables,
        summary.statements
    );
    Ok(())
}
