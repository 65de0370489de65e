use crate::mapping::Replacement;
use crate::scanner::DEFAULT_EXTENSIONS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Location of the config file relative to the working directory
pub const CONFIG_PATH: &str = ".recolor/config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Glob patterns to skip, relative to the root
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Path to a `old<TAB>new` mapping file, relative to the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<PathBuf>,

    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Inline replacement pairs, applied in the order written
    #[serde(default, rename = "replace", skip_serializing_if = "Vec::is_empty")]
    pub replacements: Vec<Replacement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// File extensions to rewrite, without the leading dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Honor ignore files and skip hidden entries
    #[serde(default)]
    pub respect_ignore: bool,

    /// Whether to use color output by default (None = auto-detect)
    #[serde(default)]
    pub use_color: Option<bool>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            respect_ignore: false,
            use_color: None,
        }
    }
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect()
}

impl Config {
    /// Load config from .recolor/config.toml if it exists
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(cwd) = std::env::current_dir() {
            let config_path = cwd.join(CONFIG_PATH);
            if config_path.exists() {
                return Self::load_from_path(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
