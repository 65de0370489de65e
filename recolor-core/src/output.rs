use crate::apply::FileOutcome;
use crate::mapping::Mapping;
use nu_ansi_term::Color;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedFile {
    pub path: PathBuf,
    pub replacements: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCount {
    pub old: String,
    pub new: String,
    pub count: usize,
}

/// Result of a replacement run over a directory tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub root: PathBuf,
    pub files_scanned: usize,
    pub unchanged: usize,
    pub updated: Vec<UpdatedFile>,
    pub failed: Vec<FileFailure>,
    pub total_replacements: usize,
    /// Per-pair totals in mapping order; pairs that never matched are dropped
    pub replacements_by_key: Vec<KeyCount>,
}

impl RunReport {
    pub fn new(root: &Path, mapping: &Mapping) -> Self {
        Self {
            root: root.to_path_buf(),
            files_scanned: 0,
            unchanged: 0,
            updated: Vec::new(),
            failed: Vec::new(),
            total_replacements: 0,
            replacements_by_key: mapping
                .iter()
                .map(|r| KeyCount {
                    old: r.old.clone(),
                    new: r.new.clone(),
                    count: 0,
                })
                .collect(),
        }
    }

    pub fn record(&mut self, outcome: &FileOutcome) {
        self.files_scanned += 1;

        match outcome {
            FileOutcome::Updated {
                path,
                replacements,
                counts,
            } => {
                for (entry, count) in self.replacements_by_key.iter_mut().zip(counts) {
                    entry.count += count;
                }
                self.total_replacements += replacements;
                self.updated.push(UpdatedFile {
                    path: path.clone(),
                    replacements: *replacements,
                });
            },
            FileOutcome::Unchanged { .. } => self.unchanged += 1,
            FileOutcome::Failed { path, error } => self.failed.push(FileFailure {
                path: path.clone(),
                error: error.to_string(),
            }),
        }
    }

    /// Drop pairs that never matched
    #[must_use]
    pub fn finish(mut self) -> Self {
        self.replacements_by_key.retain(|k| k.count > 0);
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// The mapping a run would use, and where it came from
#[derive(Debug, Clone, Serialize)]
pub struct MappingResult {
    pub source: String,
    pub mapping: Mapping,
}

/// Result of a version command
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResult {
    pub name: String,
    pub version: String,
}

/// Trait for formatting output in different formats
pub trait OutputFormatter {
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => self.format_json(),
            OutputFormat::Summary => self.format_summary(),
        }
    }
    fn format_json(&self) -> String;
    fn format_summary(&self) -> String;
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

impl OutputFormatter for RunReport {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": !self.has_errors(),
            "operation": "replace",
            "root": self.root,
            "summary": {
                "files_scanned": self.files_scanned,
                "files_updated": self.updated.len(),
                "files_unchanged": self.unchanged,
                "errors": self.failed.len(),
                "replacements": self.total_replacements,
            },
            "updated": self.updated,
            "errors": self.failed,
            "replacements_by_key": self.replacements_by_key,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();
        writeln!(
            output,
            "Updated {} ({}), {}, {} scanned",
            plural(self.updated.len(), "file"),
            plural(self.total_replacements, "replacement"),
            plural(self.failed.len(), "error"),
            plural(self.files_scanned, "file"),
        )
        .unwrap();
        output
    }
}

impl OutputFormatter for MappingResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "mapping",
            "source": self.source,
            "replacements": self.mapping,
        }))
        .unwrap_or_default()
    }

    /// The mapping as `old<TAB>new` lines, ready to be saved and edited
    fn format_summary(&self) -> String {
        let mut output = String::new();
        writeln!(output, "# source: {}", self.source).unwrap();
        output.push_str(&self.mapping.to_tsv());
        output
    }
}

impl OutputFormatter for VersionResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "version",
            "name": self.name,
            "version": self.version,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        format!("{} {}", self.name, self.version)
    }
}

/// Determine whether to use colors based on explicit preference or terminal detection
pub fn should_use_color_with_detector<F>(use_color: Option<bool>, is_terminal: F) -> bool
where
    F: Fn() -> bool,
{
    match use_color {
        Some(explicit_color) => explicit_color,
        None => is_terminal(),
    }
}

pub fn should_use_color(use_color: Option<bool>) -> bool {
    should_use_color_with_detector(use_color, || io::stdout().is_terminal())
}

/// The console line for one file, if it gets one. Unchanged files are silent.
pub fn format_outcome(outcome: &FileOutcome, use_color: bool) -> Option<String> {
    match outcome {
        FileOutcome::Updated { path, .. } => {
            let label = if use_color {
                Color::Green.bold().paint("Updated:").to_string()
            } else {
                "Updated:".to_string()
            };
            Some(format!("{} {}", label, path.display()))
        },
        FileOutcome::Failed { path, error } => {
            let label = if use_color {
                Color::Red.bold().paint("Error processing").to_string()
            } else {
                "Error processing".to_string()
            };
            Some(format!("{} {}: {}", label, path.display(), error))
        },
        FileOutcome::Unchanged { .. } => None,
    }
}
