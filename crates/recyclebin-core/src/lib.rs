use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod catalog;
pub mod channel;
pub mod config;
pub mod engine;
pub mod error;
pub mod fs;
pub mod identity;
pub mod metadata;

pub use catalog::{Entries, Reported, BACKUP_PREFIX, METADATA_PREFIX};
pub use channel::ErrorChannel;
pub use config::RecycleBinConfig;
pub use engine::RecycleBin;
pub use error::{ParseFailure, RecycleBinError, Result};
pub use fs::{FixedVolumes, SystemVolumes, VolumeSource, RECYCLE_BIN_DIR};
pub use identity::Identity;
pub use metadata::{MetadataError, MetadataRecord, RecordFormat};

/// One deleted item: a `$I` metadata record paired with its `$R` payload.
///
/// Entries are snapshots. Once restored or deleted, or after anything else
/// touches the recycle bin, an entry may be stale; operations re-check it
/// against the engine's roots before touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecycleBinEntry {
    original_path: PathBuf,
    deleted_at: DateTime<Utc>,
    metadata_path: PathBuf,
    backup_path: PathBuf,
    original_size: u64,
    format: RecordFormat,
}

impl RecycleBinEntry {
    /// Build an entry from parts, e.g. one persisted by a caller.
    ///
    /// Nothing is checked here; restore and delete validate the paths.
    /// `original_size` starts at 0 and `format` at [`RecordFormat::Modern`]
    /// since neither is known without the record. Use
    /// [`RecycleBinEntry::with_details`] to carry them over.
    pub fn new(
        original_path: impl Into<PathBuf>,
        deleted_at: DateTime<Utc>,
        metadata_path: impl Into<PathBuf>,
        backup_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            original_path: original_path.into(),
            deleted_at,
            metadata_path: metadata_path.into(),
            backup_path: backup_path.into(),
            original_size: 0,
            format: RecordFormat::Modern,
        }
    }

    /// Set the size and layout taken from the entry's metadata record
    pub fn with_details(mut self, original_size: u64, format: RecordFormat) -> Self {
        self.original_size = original_size;
        self.format = format;
        self
    }

    pub(crate) fn from_record(
        record: MetadataRecord,
        metadata_path: PathBuf,
        backup_path: PathBuf,
    ) -> Self {
        Self {
            original_path: record.original_path,
            deleted_at: record.deleted_at,
            metadata_path,
            backup_path,
            original_size: record.original_size,
            format: record.format,
        }
    }

    /// Where the item lived before it was deleted
    pub fn original_path(&self) -> &Path {
        &self.original_path
    }

    pub fn deleted_at(&self) -> DateTime<Utc> {
        self.deleted_at
    }

    /// The `$I` record
    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    /// The `$R` payload
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Size declared in the metadata record
    pub fn original_size(&self) -> u64 {
        self.original_size
    }

    pub fn format(&self) -> RecordFormat {
        self.format
    }

    /// What the payload currently is on disk
    pub fn kind(&self) -> EntryKind {
        match std::fs::symlink_metadata(&self.backup_path) {
            Ok(metadata) if metadata.is_dir() => EntryKind::Directory,
            Ok(_) => EntryKind::File,
            Err(_) => EntryKind::Missing,
        }
    }
}

/// What an entry's payload is on disk
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Directory,
    Missing,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Directory => write!(f, "directory"),
            EntryKind::Missing => write!(f, "missing"),
        }
    }
}

/// Outcome of a successful restore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreReport {
    pub restored_to: PathBuf,
    pub kind: EntryKind,
    /// False when the payload was moved back but the `$I` record could not
    /// be removed. The orphaned record goes away with the next `empty()`.
    pub metadata_retired: bool,
}

/// Outcome of emptying the recycle bin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyReport {
    pub roots: usize,
    pub removed: usize,
}
