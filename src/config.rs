//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//! built-in defaults, then a TOML file, then `DUPESCAN_*` environment
//! variables. Command-line flags are applied on top by the caller.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scanner::DEFAULT_BLOCK_SIZE;

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "DUPESCAN_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of I/O threads for checksumming.
    pub io_threads: usize,
    /// Read block size in bytes.
    pub block_size: usize,
    /// Abort on the first warning or read failure.
    pub strict: bool,
    /// Confirm checksum matches byte by byte.
    pub verify: bool,
    /// Skip hidden files and directories.
    pub skip_hidden: bool,
    /// Skip zero-length files.
    pub skip_empty: bool,
    /// Print phase durations after a text report.
    pub show_timings: bool,
    /// Gitignore-style patterns always ignored.
    pub ignore_patterns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            io_threads: 4,
            block_size: DEFAULT_BLOCK_SIZE,
            strict: false,
            verify: false,
            skip_hidden: false,
            skip_empty: false,
            show_timings: false,
            ignore_patterns: Vec::new(),
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// Falls back to defaults when the file is missing or invalid.
    #[must_use]
    pub fn load() -> Self {
        let path = Self::default_path().ok();
        match Self::load_from(path.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load the configuration, reading `path` if one is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment holds values of the
    /// wrong type. A missing file is not an error.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        Self::figment(path)
            .extract()
            .context("Invalid configuration")
    }

    /// The layered figment used by [`Config::load_from`].
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            log::debug!("Reading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Save the configuration as TOML to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Get the default platform-specific configuration path.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "dupescan", "dupescan")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }
}
