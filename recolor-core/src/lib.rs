#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod apply;
pub mod config;
pub mod mapping;
pub mod operations;
pub mod output;
pub mod scanner;

pub use apply::{replace_in_file, replace_tree, FileError, FileOutcome, RunLog};
pub use config::{Config, ConfigError};
pub use mapping::{Applied, Mapping, MappingError, Replacement};
pub use operations::{mapping_operation, replace_operation, resolve_mapping};
pub use output::{
    FileFailure, KeyCount, MappingResult, OutputFormat, OutputFormatter, RunReport, UpdatedFile,
    VersionResult,
};
pub use scanner::{
    build_globset, check_root, eligible_files, is_eligible, normalize_extension, ReplaceOptions,
    ScanError, DEFAULT_EXTENSIONS,
};

use ignore::WalkBuilder;
use std::path::Path;

/// Configure a `WalkBuilder` for a replacement run.
///
/// - Default: visit everything under the root, hidden files included, no
///   ignore files consulted
/// - `respect_ignore`: honor `.gitignore`, `.ignore` and `.recolorignore`
///   files and skip hidden entries
///
/// Symlinks are never followed.
pub fn configure_walker(root: &Path, options: &ReplaceOptions) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);

    if options.respect_ignore {
        builder
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .ignore(true)
            .parents(true)
            .hidden(true) // true = skip hidden files
            .add_custom_ignore_filename(".gitignore") // Also apply .gitignore outside git repos
            .add_custom_ignore_filename(".recolorignore");
    } else {
        builder
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .ignore(false)
            .parents(false)
            .hidden(false); // false = include hidden files
    }

    builder.follow_links(false);
    builder
}
