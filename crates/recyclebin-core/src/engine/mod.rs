//! The recycle bin engine for one identity
use std::path::{Component, Path, PathBuf};

mod delete;
mod restore;

use crate::catalog::{Entries, Reported};
use crate::channel::ErrorChannel;
use crate::config::RecycleBinConfig;
use crate::error::{RecycleBinError, Result};
use crate::fs::{self, VolumeSource, RECYCLE_BIN_DIR};
use crate::identity::Identity;
use crate::RecycleBinEntry;

/// Recycle bins of one identity across all volumes.
///
/// The set of roots is fixed when the engine is opened. Open a new engine to
/// pick up volumes mounted later.
#[derive(Debug, Clone)]
pub struct RecycleBin {
    identity: Identity,
    roots: Vec<PathBuf>,
}

impl RecycleBin {
    /// Open the recycle bins of `identity` on the given volumes
    pub fn open(identity: Identity, volumes: &dyn VolumeSource) -> Result<Self> {
        Self::open_with_bin_dir(identity, volumes, RECYCLE_BIN_DIR)
    }

    /// Open using a config's volumes and bin directory name
    pub fn with_config(identity: Identity, config: &RecycleBinConfig) -> Result<Self> {
        let volumes = config.volume_source();
        Self::open_with_bin_dir(identity, volumes.as_ref(), &config.bin_dir_name)
    }

    fn open_with_bin_dir(
        identity: Identity,
        volumes: &dyn VolumeSource,
        bin_dir_name: &str,
    ) -> Result<Self> {
        let roots = fs::discover_roots(volumes, bin_dir_name, &identity)?;
        tracing::info!("Opened {} recycle bin(s) for {}", roots.len(), identity);
        Ok(Self { identity, roots })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Discovered recycle bin roots, in volume order
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Lazily scan all roots. Each call rescans the filesystem.
    pub fn entries(&self) -> Entries<'_> {
        Entries::new(&self.roots)
    }

    /// Lazily scan all roots, delivering parse failures to `channel`
    pub fn enumerate<'s, 'c>(&'s self, channel: &'s ErrorChannel<'c>) -> Reported<'s, 'c> {
        self.entries().reported(channel)
    }

    /// Collect every decodable entry, delivering parse failures to `channel`
    pub fn list(&self, channel: &ErrorChannel<'_>) -> Vec<RecycleBinEntry> {
        self.enumerate(channel).collect()
    }

    /// Entry whose `$I` record is `metadata_path`.
    ///
    /// Relative paths and `.`/`..` components are resolved first, so
    /// `./$IABC.txt` from inside a root finds the entry.
    pub fn entry_for_metadata(&self, metadata_path: &Path) -> Result<RecycleBinEntry> {
        let wanted = normalize(metadata_path)?;
        self.entries()
            .filter_map(|item| item.ok())
            .find(|entry| {
                normalize(entry.metadata_path()).is_ok_and(|candidate| candidate == wanted)
            })
            .ok_or_else(|| RecycleBinError::NotFound {
                path: metadata_path.to_path_buf(),
            })
    }

    /// Check that both files of `entry` sit inside the same managed root
    pub(crate) fn validate(&self, entry: &RecycleBinEntry) -> Result<()> {
        let metadata_path = entry.metadata_path();
        let root = self
            .roots
            .iter()
            .find(|root| is_strictly_inside(metadata_path, root))
            .ok_or_else(|| RecycleBinError::InvalidEntry {
                path: metadata_path.to_path_buf(),
            })?;

        if !is_strictly_inside(entry.backup_path(), root) {
            return Err(RecycleBinError::InvalidEntry {
                path: entry.backup_path().to_path_buf(),
            });
        }

        Ok(())
    }
}

/// Canonical form of `path`, or its absolute form when it does not exist
fn normalize(path: &Path) -> std::io::Result<PathBuf> {
    match std::fs::canonicalize(path) {
        Ok(canonical) => Ok(canonical),
        Err(_) => std::path::absolute(path),
    }
}

fn is_strictly_inside(path: &Path, root: &Path) -> bool {
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return false;
    }
    path != root && path.starts_with(root)
}
