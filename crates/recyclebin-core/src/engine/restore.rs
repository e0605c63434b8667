use std::path::Path;

use super::RecycleBin;
use crate::error::{RecycleBinError, Result};
use crate::fs::ops;
use crate::{RecycleBinEntry, RestoreReport};

impl RecycleBin {
    /// Move an entry's payload back to its original path.
    ///
    /// Fails without touching anything when the entry is not ours, the
    /// destination is taken or the payload is gone. Missing parent
    /// directories are recreated.
    pub fn restore(&self, entry: &RecycleBinEntry) -> Result<RestoreReport> {
        self.validate(entry)?;

        let destination = entry.original_path();
        if ops::path_exists(destination)? {
            return Err(RecycleBinError::RestoreConflict {
                path: destination.to_path_buf(),
            });
        }
        if !ops::path_exists(entry.backup_path())? {
            return Err(RecycleBinError::NotFound {
                path: entry.backup_path().to_path_buf(),
            });
        }

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                tracing::info!("Recreating missing directory {}", parent.display());
                std::fs::create_dir_all(parent)?;
            }
        }

        let kind = entry.kind();
        ops::move_path(entry.backup_path(), destination)?;

        // The payload is back; a leftover record is cleaned up by empty()
        let metadata_retired = match ops::remove_path(entry.metadata_path()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    "Restored {} but could not remove {}: {}",
                    destination.display(),
                    entry.metadata_path().display(),
                    e
                );
                false
            }
        };

        tracing::info!(
            "Restored {} {} from {}",
            kind,
            destination.display(),
            entry.backup_path().display()
        );

        Ok(RestoreReport {
            restored_to: destination.to_path_buf(),
            kind,
            metadata_retired,
        })
    }

    /// Restore the most recently deleted entry for `original_path`
    pub fn restore_path(&self, original_path: impl AsRef<Path>) -> Result<RestoreReport> {
        let entry = self.latest_entry_for(original_path.as_ref())?;
        self.restore(&entry)
    }

    /// Most recently deleted entry for `original_path`.
    ///
    /// Entries with the same deletion time are ordered by metadata path and
    /// the greatest one wins.
    pub fn latest_entry_for(&self, original_path: &Path) -> Result<RecycleBinEntry> {
        self.entries()
            .filter_map(|item| match item {
                Ok(entry) => Some(entry),
                Err(failure) => {
                    tracing::debug!("Skipping unreadable entry: {}", failure);
                    None
                }
            })
            .filter(|entry| entry.original_path() == original_path)
            .max_by(|a, b| {
                a.deleted_at()
                    .cmp(&b.deleted_at())
                    .then_with(|| a.metadata_path().cmp(b.metadata_path()))
            })
            .ok_or_else(|| RecycleBinError::NotFound {
                path: original_path.to_path_buf(),
            })
    }
}
