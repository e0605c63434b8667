//! Recycle bin directory discovery and filesystem helpers
use std::path::{Path, PathBuf};

pub mod ops;
pub mod volumes;

pub use volumes::{FixedVolumes, SystemVolumes, VolumeSource};

use crate::error::{RecycleBinError, Result};
use crate::identity::Identity;

/// Name of the per-volume recycle bin directory
pub const RECYCLE_BIN_DIR: &str = "$Recycle.Bin";

/// Candidate recycle bin root for one volume and identity
pub fn trash_root(volume: &Path, bin_dir_name: &str, identity: &Identity) -> PathBuf {
    volume.join(bin_dir_name).join(identity.as_str())
}

/// Find every existing recycle bin root for `identity`.
///
/// Roots come back in volume order without duplicates. An empty result is
/// an error: there is nothing to operate on.
pub fn discover_roots(
    volumes: &dyn VolumeSource,
    bin_dir_name: &str,
    identity: &Identity,
) -> Result<Vec<PathBuf>> {
    let mut roots: Vec<PathBuf> = Vec::new();

    for volume in volumes.volumes()? {
        let candidate = trash_root(&volume, bin_dir_name, identity);
        if !candidate.is_dir() {
            tracing::debug!("No recycle bin at {}", candidate.display());
            continue;
        }
        if !roots.contains(&candidate) {
            tracing::debug!("Found recycle bin at {}", candidate.display());
            roots.push(candidate);
        }
    }

    if roots.is_empty() {
        return Err(RecycleBinError::NoTrashDirectory {
            identity: identity.to_string(),
        });
    }

    Ok(roots)
}
