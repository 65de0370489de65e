use anyhow::Result;
use recolor_core::{mapping_operation, Config, OutputFormatter};
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;

pub fn handle_mapping(
    mapping_file: Option<PathBuf>,
    config: &Config,
    config_dir: &Path,
    output: OutputFormat,
) -> Result<()> {
    let result = mapping_operation(mapping_file.as_deref(), config, config_dir)?;
    let formatted = result.format(output.into());

    if formatted.ends_with('\n') {
        print!("{}", formatted);
    } else {
        println!("{}", formatted);
    }
    Ok(())
}
