use anyhow::Result;
use recolor_core::output::format_outcome;
use recolor_core::{
    normalize_extension, replace_operation, resolve_mapping, Config, FileOutcome,
    OutputFormatter, ReplaceOptions, ScanError,
};
use std::path::{Path, PathBuf};

use crate::cli::{FilterArgs, OutputFormat};

/// Merge CLI filters over the config defaults
pub fn build_options(filter: FilterArgs, config: &Config) -> Result<ReplaceOptions, ScanError> {
    let raw = if filter.extensions.is_empty() {
        config.defaults.extensions.clone()
    } else {
        filter.extensions
    };

    let extensions: Vec<String> = raw
        .iter()
        .map(|e| normalize_extension(e))
        .filter(|e| !e.is_empty())
        .collect();

    if extensions.is_empty() {
        return Err(ScanError::NoExtensions);
    }

    let mut excludes = config.exclude.clone();
    excludes.extend(filter.exclude);

    Ok(ReplaceOptions {
        extensions,
        excludes,
        respect_ignore: filter.respect_ignore || config.defaults.respect_ignore,
    })
}

#[allow(clippy::too_many_arguments)]
pub fn handle_replace(
    root: &Path,
    mapping_file: Option<PathBuf>,
    filter: FilterArgs,
    log_file: Option<PathBuf>,
    config: &Config,
    config_dir: &Path,
    use_color: bool,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let resolved = resolve_mapping(mapping_file.as_deref(), config, config_dir)?;
    let options = build_options(filter, config)?;

    if std::env::var("RECOLOR_DEBUG").is_ok() {
        eprintln!(
            "REPLACE: {} pairs from {}, extensions {:?}",
            resolved.mapping.len(),
            resolved.source,
            options.extensions
        );
    }

    let progressive = output == OutputFormat::Summary;
    let report = replace_operation(
        root,
        &resolved.mapping,
        &options,
        log_file.as_deref(),
        |outcome| {
            if !progressive {
                return;
            }
            let Some(line) = format_outcome(outcome, use_color) else {
                return;
            };
            match outcome {
                FileOutcome::Failed { .. } => eprintln!("{}", line),
                _ if !quiet => println!("{}", line),
                _ => {},
            }
        },
    )?;

    if !quiet {
        match output {
            OutputFormat::Json => println!("{}", report.format_json()),
            OutputFormat::Summary => print!("{}", report.format_summary()),
        }
    }

    Ok(())
}
