//! Engine configuration
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::RecycleBinError;
use crate::fs::{FixedVolumes, SystemVolumes, VolumeSource, RECYCLE_BIN_DIR};
use crate::identity::Identity;

/// Where to look for recycle bins and for whom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecycleBinConfig {
    /// Volume roots to search; empty means every mounted volume
    pub volumes: Vec<PathBuf>,
    /// Name of the bin directory at each volume root
    pub bin_dir_name: String,
    /// Identity used when none is given explicitly
    pub identity: Option<String>,
}

impl Default for RecycleBinConfig {
    fn default() -> Self {
        Self {
            volumes: Vec::new(),
            bin_dir_name: RECYCLE_BIN_DIR.to_string(),
            identity: None,
        }
    }
}

impl RecycleBinConfig {
    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .context(format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .context(format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Get the default config path (~/.recyclebin/config.json)
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".recyclebin").join("config.json"))
    }

    /// Load the default config file, or defaults when there is none
    pub fn load_or_default() -> Result<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn volume_source(&self) -> Box<dyn VolumeSource> {
        if self.volumes.is_empty() {
            Box::new(SystemVolumes)
        } else {
            Box::new(FixedVolumes::new(self.volumes.iter().cloned()))
        }
    }

    /// The configured identity, validated
    pub fn identity(&self) -> Result<Option<Identity>, RecycleBinError> {
        self.identity.as_deref().map(Identity::new).transpose()
    }
}
