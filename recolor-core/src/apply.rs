use crate::mapping::{Applied, Mapping};
use crate::output::RunReport;
use crate::scanner::{eligible_files, ReplaceOptions, ScanError};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a single file could not be processed
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to read file: {0}")]
    Read(io::Error),

    #[error("invalid UTF-8 at byte offset {offset}")]
    Decode { offset: usize },

    #[error("failed to write file: {0}")]
    Write(io::Error),
}

/// What happened to one eligible file
#[derive(Debug)]
pub enum FileOutcome {
    Updated {
        path: PathBuf,
        replacements: usize,
        /// Occurrences replaced per mapping pair
        counts: Vec<usize>,
    },
    Unchanged {
        path: PathBuf,
    },
    Failed {
        path: PathBuf,
        error: FileError,
    },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Updated { path, .. } | Self::Unchanged { path } | Self::Failed { path, .. } => {
                path
            },
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

/// Append-only, timestamped record of a run
pub struct RunLog {
    file: Option<File>,
}

impl RunLog {
    pub fn disabled() -> Self {
        Self { file: None }
    }

    pub fn open(path: Option<&Path>) -> io::Result<Self> {
        let file = if let Some(path) = path {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            Some(OpenOptions::new().create(true).append(true).open(path)?)
        } else {
            None
        };

        Ok(Self { file })
    }

    pub fn log(&mut self, message: &str) -> io::Result<()> {
        if let Some(ref mut file) = self.file {
            writeln!(
                file,
                "[{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                message
            )?;
            file.flush()?;
        }
        Ok(())
    }

    pub fn record(&mut self, outcome: &FileOutcome) -> io::Result<()> {
        match outcome {
            FileOutcome::Updated {
                path, replacements, ..
            } => self.log(&format!(
                "Updated: {} ({} replacements)",
                path.display(),
                replacements
            )),
            FileOutcome::Unchanged { path } => self.log(&format!("Unchanged: {}", path.display())),
            FileOutcome::Failed { path, error } => {
                self.log(&format!("Error processing {}: {}", path.display(), error))
            },
        }
    }
}

/// Replace `path` with `content` without ever leaving a half-written file.
///
/// The text goes to a temporary file next to the original, which takes over
/// the original's permissions and is then renamed over it. Read-only files
/// are refused.
pub fn write_in_place(path: &Path, content: &str) -> io::Result<()> {
    let permissions = fs::metadata(path)?.permissions();
    if permissions.readonly() {
        return Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "file is read-only",
        ));
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".recolor-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    fs::set_permissions(temp.path(), permissions)?;
    temp.persist(path).map_err(|e| e.error)?;

    #[cfg(unix)]
    {
        File::open(dir)?.sync_all()?;
    }

    Ok(())
}

fn rewrite(path: &Path, mapping: &Mapping) -> Result<Option<Applied>, FileError> {
    // Write through symlinks so the link itself survives the rename
    let target = fs::canonicalize(path).map_err(FileError::Read)?;
    let bytes = fs::read(&target).map_err(FileError::Read)?;
    let original = String::from_utf8(bytes).map_err(|e| FileError::Decode {
        offset: e.utf8_error().valid_up_to(),
    })?;

    let applied = mapping.apply(&original);
    if applied.text == original {
        return Ok(None);
    }

    write_in_place(&target, &applied.text).map_err(FileError::Write)?;
    Ok(Some(applied))
}

/// Apply `mapping` to one file, rewriting it only if the text changed
pub fn replace_in_file(path: &Path, mapping: &Mapping) -> FileOutcome {
    let path_buf = path.to_path_buf();

    match rewrite(path, mapping) {
        Ok(Some(applied)) => FileOutcome::Updated {
            path: path_buf,
            replacements: applied.total(),
            counts: applied.counts,
        },
        Ok(None) => FileOutcome::Unchanged { path: path_buf },
        Err(error) => FileOutcome::Failed {
            path: path_buf,
            error,
        },
    }
}

/// Run `mapping` over every eligible file under `root`, one file at a time.
///
/// `on_outcome` sees each outcome as soon as the file is done. A failure on
/// one file is recorded and the run moves on; only problems with the root
/// itself abort the run.
pub fn replace_tree<F>(
    root: &Path,
    mapping: &Mapping,
    options: &ReplaceOptions,
    mut on_outcome: F,
) -> Result<RunReport, ScanError>
where
    F: FnMut(&FileOutcome),
{
    let files = eligible_files(root, options)?;
    let debug = std::env::var("RECOLOR_DEBUG").is_ok();

    let mut report = RunReport::new(root, mapping);
    for path in files {
        let outcome = replace_in_file(&path, mapping);

        if debug {
            if let FileOutcome::Updated { replacements, .. } = &outcome {
                eprintln!(
                    "APPLY: {} replacements in {}",
                    replacements,
                    path.display()
                );
            }
        }

        on_outcome(&outcome);
        report.record(&outcome);
    }

    Ok(report.finish())
}
