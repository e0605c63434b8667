//! Shared fixtures: temp directories standing in for volumes, and a helper
//! that recycles files the way the shell does.
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use recyclebin_core::{
    FixedVolumes, Identity, MetadataRecord, RecordFormat, RecycleBin, BACKUP_PREFIX,
    METADATA_PREFIX, RECYCLE_BIN_DIR,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

pub const SID: &str = "S-1-5-21-3623811015-3361044348-30300820-1013";

pub fn sid() -> Identity {
    Identity::new(SID).unwrap()
}

/// A temp directory acting as a volume root
pub struct TestVolume {
    dir: TempDir,
}

impl TestVolume {
    /// A volume with an (empty) recycle bin for `SID`
    pub fn new() -> Self {
        let volume = Self::without_bin();
        fs::create_dir_all(volume.bin_root()).unwrap();
        volume
    }

    pub fn without_bin() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn bin_root(&self) -> PathBuf {
        self.path().join(RECYCLE_BIN_DIR).join(SID)
    }

    /// A fresh directory for test files on this volume
    pub fn test_folder(&self) -> PathBuf {
        let path = self.path().join("TestFolders").join(Uuid::new_v4().to_string());
        fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn open(&self) -> RecycleBin {
        RecycleBin::open(sid(), &FixedVolumes::new([self.path()])).unwrap()
    }
}

/// Paths of one recycled item
pub struct Recycled {
    pub metadata_path: PathBuf,
    pub backup_path: PathBuf,
}

pub fn create_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Recycle `path` into `bin_root` with a random suffix, as a modern record
pub fn recycle(bin_root: &Path, path: &Path, deleted_at: DateTime<Utc>) -> Recycled {
    recycle_with(bin_root, path, deleted_at, RecordFormat::Modern, &random_suffix(path))
}

/// Recycle `path` with full control over the record
pub fn recycle_with(
    bin_root: &Path,
    path: &Path,
    deleted_at: DateTime<Utc>,
    format: RecordFormat,
    suffix: &str,
) -> Recycled {
    let metadata = fs::symlink_metadata(path).unwrap();
    let record = MetadataRecord {
        original_size: if metadata.is_dir() { 0 } else { metadata.len() },
        deleted_at,
        original_path: path.to_path_buf(),
        format,
    };

    let metadata_path = bin_root.join(format!("{}{}", METADATA_PREFIX, suffix));
    let backup_path = bin_root.join(format!("{}{}", BACKUP_PREFIX, suffix));
    fs::write(&metadata_path, record.encode().unwrap()).unwrap();
    fs::rename(path, &backup_path).unwrap();

    Recycled {
        metadata_path,
        backup_path,
    }
}

/// Create a file named `<prefix>-<uuid>` in `dir` and recycle it
pub fn create_and_recycle_with_prefix(bin_root: &Path, dir: &Path, prefix: &str) -> Recycled {
    let path = dir.join(format!("{}-{}", prefix, Uuid::new_v4()));
    create_file(&path, "test");
    recycle(bin_root, &path, Utc::now())
}

fn random_suffix(path: &Path) -> String {
    let id = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{}.{}", id, ext),
        None => id,
    }
}
