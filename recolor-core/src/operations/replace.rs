use crate::apply::{replace_tree, FileOutcome, RunLog};
use crate::mapping::Mapping;
use crate::output::RunReport;
use crate::scanner::ReplaceOptions;
use anyhow::{Context, Result};
use std::path::Path;

/// Replace operation - runs the mapping over `root` and returns the report.
///
/// When `log_file` is set, every outcome is appended to it with a timestamp.
/// A log write failure is reported once on stderr and does not stop the run.
pub fn replace_operation<F>(
    root: &Path,
    mapping: &Mapping,
    options: &ReplaceOptions,
    log_file: Option<&Path>,
    mut on_outcome: F,
) -> Result<RunReport>
where
    F: FnMut(&FileOutcome),
{
    let mut log = RunLog::open(log_file).with_context(|| {
        format!(
            "Failed to open log file {}",
            log_file.map(|p| p.display().to_string()).unwrap_or_default()
        )
    })?;

    log.log(&format!(
        "Starting run over {} ({} replacement pairs, extensions: {})",
        root.display(),
        mapping.len(),
        options.extensions.join(",")
    ))?;

    let mut log_warned = false;
    let report = replace_tree(root, mapping, options, |outcome| {
        if let Err(e) = log.record(outcome) {
            if !log_warned {
                eprintln!("Warning: failed to write run log: {}", e);
                log_warned = true;
            }
        }
        on_outcome(outcome);
    })?;

    if !log_warned {
        log.log(&format!(
            "Finished: {} updated, {} unchanged, {} errors",
            report.updated.len(),
            report.unchanged,
            report.failed.len()
        ))?;
    }

    Ok(report)
}
