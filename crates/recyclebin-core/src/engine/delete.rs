use super::RecycleBin;
use crate::error::Result;
use crate::fs::ops;
use crate::{EmptyReport, RecycleBinEntry};

impl RecycleBin {
    /// Remove an entry's payload and metadata record for good
    pub fn delete_permanently(&self, entry: &RecycleBinEntry) -> Result<()> {
        self.validate(entry)?;

        ops::remove_path(entry.backup_path())?;
        ops::remove_path(entry.metadata_path())?;

        tracing::info!(
            "Permanently deleted {} ({})",
            entry.original_path().display(),
            entry.metadata_path().display()
        );
        Ok(())
    }

    /// Remove everything directly inside every root, parsable or not
    pub fn empty(&self) -> Result<EmptyReport> {
        let mut removed = 0;

        for root in &self.roots {
            for dirent in std::fs::read_dir(root)? {
                let path = dirent?.path();
                tracing::debug!("Removing {}", path.display());
                ops::remove_path(&path)?;
                removed += 1;
            }
        }

        tracing::info!("Emptied {} recycle bin(s), removed {} item(s)", self.roots.len(), removed);
        Ok(EmptyReport {
            roots: self.roots.len(),
            removed,
        })
    }
}
