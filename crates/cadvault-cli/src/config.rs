//! Run configuration loaded from `cadvault.toml`.
//!
//! Precedence, highest first: command-line flags, the
//! `CADVAULT_LIBRARY_ROOT` environment variable, the config file, built-in
//! defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cadvault_index::{IndexOptions, RevisionRuleConfig};

/// Library root used when nothing else is configured.
pub const DEFAULT_LIBRARY_ROOT: &str = r"C:\AVPVault\Genie\Design Engineering\Library\";

/// Environment variable overriding the library root.
pub const LIBRARY_ROOT_ENV_VAR: &str = "CADVAULT_LIBRARY_ROOT";

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "cadvault.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub library_root: PathBuf,
    pub follow_links: bool,
    pub revision: RevisionRuleConfig,
    /// Resolution workers; `0` or `1` resolves on the calling thread.
    pub threads: usize,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            library_root: PathBuf::from(DEFAULT_LIBRARY_ROOT),
            follow_links: false,
            revision: RevisionRuleConfig::default(),
            threads: 0,
        }
    }
}

impl VaultConfig {
    /// Load configuration from an explicit path or the implicit default file.
    ///
    /// An explicit file must exist and parse. The implicit file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("read config: {}", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("parse config: {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply environment overrides using `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(LIBRARY_ROOT_ENV_VAR).filter(|v| !v.trim().is_empty()) {
            self.library_root = PathBuf::from(root.trim());
        }
    }

    /// Index options for this configuration.
    pub fn index_options(&self) -> Result<IndexOptions> {
        let rule = self
            .revision
            .build()
            .context("build revision rule")?;
        Ok(IndexOptions::default()
            .with_follow_links(self.follow_links)
            .with_revision_rule(rule))
    }
}
