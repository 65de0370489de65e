use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions rewritten when nothing else is configured
pub const DEFAULT_EXTENSIONS: &[&str] = &["tsx", "ts", "css"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceOptions {
    /// File name suffixes, without the leading dot
    pub extensions: Vec<String>,
    /// Glob patterns (relative to the root) to skip
    pub excludes: Vec<String>,
    /// Honor ignore files and skip hidden entries
    pub respect_ignore: bool,
}

impl Default for ReplaceOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
            excludes: vec![],
            respect_ignore: false,
        }
    }
}

/// Fatal problems that stop a run before any file is touched
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("root directory not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("root path is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("cannot read root directory {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid exclude pattern")]
    InvalidExclude(#[from] globset::Error),

    #[error("no file extensions to match")]
    NoExtensions,
}

/// Strip a leading dot so `.ts` and `ts` mean the same thing
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_string()
}

/// A file is eligible when its name ends with `.<ext>` for one of `extensions`
pub fn is_eligible(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy();

    extensions
        .iter()
        .any(|ext| !ext.is_empty() && name.ends_with(&format!(".{}", ext)))
}

/// Verify the root exists and can be listed before anything is touched
pub fn check_root(root: &Path) -> Result<(), ScanError> {
    let metadata = fs::metadata(root).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ScanError::NotFound {
                path: root.to_path_buf(),
            }
        } else {
            ScanError::Unreadable {
                path: root.to_path_buf(),
                source,
            }
        }
    })?;

    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    fs::read_dir(root).map_err(|source| ScanError::Unreadable {
        path: root.to_path_buf(),
        source,
    })?;

    Ok(())
}

pub fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, globset::Error> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);

        // A bare directory name (no wildcards, no extension) or `dir/` also
        // covers everything below it
        if pattern.ends_with('/')
            || (!pattern.contains('*') && !pattern.contains('?') && !pattern.contains('.'))
        {
            let recursive_pattern = if pattern.ends_with('/') {
                format!("{}**", pattern)
            } else {
                format!("{}/**", pattern)
            };
            builder.add(Glob::new(&recursive_pattern)?);
        }
    }
    Ok(Some(builder.build()?))
}

/// Walk `root` and return every eligible file.
///
/// Entries the walker cannot read below the root are skipped.
pub fn eligible_files(root: &Path, options: &ReplaceOptions) -> Result<Vec<PathBuf>, ScanError> {
    check_root(root)?;

    let exclude_globs = build_globset(&options.excludes)?;
    let walker = crate::configure_walker(root, options).build();
    let debug = std::env::var("RECOLOR_DEBUG").is_ok();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if debug {
                    eprintln!("SCANNER: skipping entry: {}", err);
                }
                continue;
            },
        };

        let path = entry.path();
        let is_file = match entry.file_type() {
            Some(t) if t.is_file() => true,
            // Links to regular files count, links to directories are never descended
            Some(t) if t.is_symlink() => fs::metadata(path).is_ok_and(|m| m.is_file()),
            _ => false,
        };
        if !is_file {
            continue;
        }

        if !is_eligible(path, &options.extensions) {
            continue;
        }

        if let Some(ref excludes) = exclude_globs {
            let relative_path = path.strip_prefix(root).unwrap_or(path);
            if excludes.is_match(relative_path) {
                continue;
            }
        }

        files.push(path.to_path_buf());
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|e| (*e).to_string()).collect()
    }

    #[test]
    fn test_replace_options_default() {
        let opts = ReplaceOptions::default();
        assert_eq!(opts.extensions, exts(&["tsx", "ts", "css"]));
        assert!(opts.excludes.is_empty());
        assert!(!opts.respect_ignore);
    }

    #[test]
    fn test_is_eligible() {
        let extensions = exts(&["tsx", "ts", "css"]);
        assert!(is_eligible(Path::new("src/App.tsx"), &extensions));
        assert!(is_eligible(Path::new("src/api.ts"), &extensions));
        assert!(is_eligible(Path::new("types.d.ts"), &extensions));
        assert!(is_eligible(Path::new("index.css"), &extensions));

        assert!(!is_eligible(Path::new("styles.scss"), &extensions));
        assert!(!is_eligible(Path::new("package.json"), &extensions));
        assert!(!is_eligible(Path::new("README.md"), &extensions));
        assert!(!is_eligible(Path::new("ts"), &extensions));
    }

    #[test]
    fn test_is_eligible_ignores_empty_extension() {
        assert!(!is_eligible(Path::new("file."), &exts(&[""])));
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension(".tsx"), "tsx");
        assert_eq!(normalize_extension("css"), "css");
        assert_eq!(normalize_extension(" .ts "), "ts");
    }

    #[test]
    fn test_build_globset_empty() {
        let result = build_globset(&[]).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_build_globset_directory_exclusion() {
        let patterns = vec!["node_modules".to_string()];
        let globset = build_globset(&patterns).unwrap().unwrap();

        assert!(globset.is_match("node_modules"));
        assert!(globset.is_match("node_modules/react/index.ts"));
        assert!(!globset.is_match("src/node_modules.ts"));
    }

    #[test]
    fn test_build_globset_directory_with_slash() {
        let patterns = vec!["dist/".to_string()];
        let globset = build_globset(&patterns).unwrap().unwrap();

        assert!(globset.is_match("dist/"));
        assert!(globset.is_match("dist/assets/main.css"));
    }

    #[test]
    fn test_check_root_missing() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        let err = check_root(&missing).unwrap_err();
        assert!(matches!(err, ScanError::NotFound { .. }));
        assert!(err.to_string().contains("root directory not found"));
    }

    #[test]
    fn test_check_root_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.ts");
        fs::write(&file, "x").unwrap();

        let err = check_root(&file).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory { .. }));
    }

    #[test]
    fn test_eligible_files_filters_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src/components")).unwrap();
        fs::write(root.join("src/App.tsx"), "").unwrap();
        fs::write(root.join("src/components/Header.tsx"), "").unwrap();
        fs::write(root.join("src/index.css"), "").unwrap();
        fs::write(root.join("package.json"), "").unwrap();
        fs::write(root.join("README.md"), "").unwrap();

        let mut files = eligible_files(root, &ReplaceOptions::default()).unwrap();
        files.sort();

        assert_eq!(
            files,
            vec![
                root.join("src/App.tsx"),
                root.join("src/components/Header.tsx"),
                root.join("src/index.css"),
            ]
        );
    }

    #[test]
    fn test_eligible_files_includes_hidden_and_ignored_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join(".storybook")).unwrap();
        fs::write(root.join(".storybook/preview.ts"), "").unwrap();
        fs::write(root.join(".gitignore"), "generated.ts\n").unwrap();
        fs::write(root.join("generated.ts"), "").unwrap();

        let files = eligible_files(root, &ReplaceOptions::default()).unwrap();
        assert_eq!(files.len(), 2);

        let respecting = ReplaceOptions {
            respect_ignore: true,
            ..Default::default()
        };
        let files = eligible_files(root, &respecting).unwrap();
        assert!(files.is_empty(), "found {:?}", files);
    }

    #[test]
    fn test_eligible_files_applies_excludes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("node_modules/pkg/index.ts"), "").unwrap();
        fs::write(root.join("main.ts"), "").unwrap();

        let opts = ReplaceOptions {
            excludes: vec!["node_modules".to_string()],
            ..Default::default()
        };
        let files = eligible_files(root, &opts).unwrap();
        assert_eq!(files, vec![root.join("main.ts")]);
    }

    #[test]
    fn test_eligible_files_bad_exclude_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let opts = ReplaceOptions {
            excludes: vec!["[".to_string()],
            ..Default::default()
        };
        let err = eligible_files(temp_dir.path(), &opts).unwrap_err();
        assert!(matches!(err, ScanError::InvalidExclude(_)));
    }
}
