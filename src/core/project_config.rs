//! Project configuration
//!
//! Reads optional per-project defaults from `buildseq.toml` in the source
//! directory. Every value can still be overridden on the command line.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::defaults::CONFIG_FILE_NAME;
use crate::core::options::{BuildType, Generator};
use crate::error::ConfigError;

/// Contents of `buildseq.toml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Build settings
    #[serde(default)]
    pub build: BuildSection,

    /// Package generation settings
    #[serde(default)]
    pub package: PackageSection,

    /// Privileged command settings
    #[serde(default)]
    pub privilege: PrivilegeSection,
}

/// `[build]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    pub generator: Option<Generator>,
    pub build_type: Option<BuildType>,
    pub build_path: Option<PathBuf>,
    /// Validated and clamped like `--jobs`
    pub jobs: Option<i64>,
    pub parallel: Option<bool>,
    pub colorize: Option<bool>,
}

/// `[package]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSection {
    pub deb: Option<bool>,
    pub rpm: Option<bool>,
}

/// `[privilege]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrivilegeSection {
    /// Program prefixed to privileged commands; empty disables elevation
    pub elevate: Option<String>,
}

impl ProjectConfig {
    /// Parse config from TOML text
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load the project config from the source directory
    ///
    /// A missing file yields the default configuration.
    pub fn load(source_dir: &Path) -> Result<Self, ConfigError> {
        Self::load_from_path(&source_dir.join(CONFIG_FILE_NAME))
    }

    /// Load config from a specific path, defaulting when it does not exist
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No project config at {}", path.display());
            return Ok(Self::default());
        }
        Self::read(path)
    }

    /// Load config from a path the user named explicitly
    pub fn load_required(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Self::read(path)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config = Self::from_toml(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        tracing::info!("Loaded project config from {}", path.display());
        Ok(config)
    }
}
