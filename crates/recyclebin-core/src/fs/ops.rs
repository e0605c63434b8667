//! Thin wrappers over the filesystem primitives the engine relies on
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

/// Upper bound on how much of a metadata file is read.
///
/// The largest legal modern record (32767 characters) is just over 64 KiB.
pub const MAX_RECORD_LEN: u64 = 128 * 1024;

/// Read a metadata record, at most `MAX_RECORD_LEN` bytes
pub fn read_record(path: &Path) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut data = Vec::new();
    file.take(MAX_RECORD_LEN).read_to_end(&mut data)?;
    Ok(data)
}

/// Check whether anything, including a dangling symlink, occupies `path`
pub fn path_exists(path: &Path) -> io::Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Move a file or a whole directory tree.
///
/// This is a rename, so the inode and with it timestamps and attributes are
/// kept. Source and destination must be on the same volume.
pub fn move_path(source: &Path, destination: &Path) -> io::Result<()> {
    fs::rename(source, destination)
}

/// Remove a file, a symlink (without following it) or a directory tree
pub fn remove_path(path: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
