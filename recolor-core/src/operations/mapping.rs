use crate::config::Config;
use crate::mapping::Mapping;
use crate::output::MappingResult;
use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where the effective mapping came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingSource {
    /// `--mapping <FILE>`
    File(PathBuf),
    /// `mapping = "..."` in the config file
    ConfigFile(PathBuf),
    /// `[[replace]]` pairs in the config file
    ConfigInline,
    Builtin,
}

impl fmt::Display for MappingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::ConfigFile(path) => write!(f, "{} (from config)", path.display()),
            Self::ConfigInline => write!(f, "config"),
            Self::Builtin => write!(f, "builtin"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedMapping {
    pub mapping: Mapping,
    pub source: MappingSource,
}

/// Pick the mapping for a run.
///
/// `mapping_file` wins, then the config's mapping file (relative to
/// `config_dir`), then the config's inline pairs, then the builtin table.
pub fn resolve_mapping(
    mapping_file: Option<&Path>,
    config: &Config,
    config_dir: &Path,
) -> Result<ResolvedMapping> {
    if let Some(path) = mapping_file {
        let mapping = Mapping::load_tsv(path)?;
        return Ok(ResolvedMapping {
            mapping,
            source: MappingSource::File(path.to_path_buf()),
        });
    }

    if let Some(ref relative) = config.mapping {
        let path = config_dir.join(relative);
        let mapping = Mapping::load_tsv(&path)?;
        return Ok(ResolvedMapping {
            mapping,
            source: MappingSource::ConfigFile(path),
        });
    }

    if !config.replacements.is_empty() {
        let mapping = Mapping::new(config.replacements.clone())
            .context("Invalid [[replace]] entries in config")?;
        return Ok(ResolvedMapping {
            mapping,
            source: MappingSource::ConfigInline,
        });
    }

    Ok(ResolvedMapping {
        mapping: Mapping::builtin(),
        source: MappingSource::Builtin,
    })
}

/// Mapping operation - returns the effective mapping as structured data
pub fn mapping_operation(
    mapping_file: Option<&Path>,
    config: &Config,
    config_dir: &Path,
) -> Result<MappingResult> {
    let resolved = resolve_mapping(mapping_file, config, config_dir)?;

    Ok(MappingResult {
        source: resolved.source.to_string(),
        mapping: resolved.mapping,
    })
}
