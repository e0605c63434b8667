//! Pairing of `$R` payloads with their `$I` metadata records
use std::fs::{self, DirEntry, ReadDir};
use std::path::{Path, PathBuf};

use crate::channel::ErrorChannel;
use crate::error::ParseFailure;
use crate::metadata;
use crate::RecycleBinEntry;

/// File name prefix of metadata records
pub const METADATA_PREFIX: &str = "$I";

/// File name prefix of backup payloads
pub const BACKUP_PREFIX: &str = "$R";

/// Metadata file that belongs to a backup file name, if it is one
pub fn metadata_name_for(backup_name: &str) -> Option<String> {
    backup_name
        .strip_prefix(BACKUP_PREFIX)
        .map(|suffix| format!("{}{}", METADATA_PREFIX, suffix))
}

/// Lazy scan over a set of recycle bin roots.
///
/// Directories are listed as iteration reaches them, so every new `Entries`
/// reflects the filesystem at that moment.
pub struct Entries<'a> {
    roots: std::slice::Iter<'a, PathBuf>,
    current: Option<(&'a Path, ReadDir)>,
}

impl<'a> Entries<'a> {
    pub(crate) fn new(roots: &'a [PathBuf]) -> Self {
        Self {
            roots: roots.iter(),
            current: None,
        }
    }

    /// Drop failures into `channel` and yield only decoded entries
    pub fn reported<'c>(self, channel: &'a ErrorChannel<'c>) -> Reported<'a, 'c> {
        Reported {
            entries: self,
            channel,
        }
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = Result<RecycleBinEntry, ParseFailure>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((root, dir)) = self.current.as_mut() {
                let root: &'a Path = *root;
                match dir.next() {
                    Some(Ok(dirent)) => {
                        if let Some(item) = pair(root, &dirent) {
                            return Some(item);
                        }
                        continue;
                    }
                    Some(Err(err)) => {
                        let failure = ParseFailure::new(root, err);
                        self.current = None;
                        return Some(Err(failure));
                    }
                    None => self.current = None,
                }
            }

            let root = self.roots.next()?;
            match fs::read_dir(root) {
                Ok(dir) => self.current = Some((root.as_path(), dir)),
                Err(err) => return Some(Err(ParseFailure::new(root.as_path(), err))),
            }
        }
    }
}

/// Entries with failures routed to an [`ErrorChannel`]
pub struct Reported<'a, 'c> {
    entries: Entries<'a>,
    channel: &'a ErrorChannel<'c>,
}

impl Iterator for Reported<'_, '_> {
    type Item = RecycleBinEntry;

    fn next(&mut self) -> Option<Self::Item> {
        for item in self.entries.by_ref() {
            match item {
                Ok(entry) => return Some(entry),
                Err(failure) => self.channel.report(&failure),
            }
        }
        None
    }
}

fn pair(root: &Path, dirent: &DirEntry) -> Option<Result<RecycleBinEntry, ParseFailure>> {
    let file_name = dirent.file_name();
    let metadata_name = metadata_name_for(file_name.to_str()?)?;
    let metadata_path = root.join(metadata_name);
    Some(load_entry(metadata_path, dirent.path()))
}

/// Decode the metadata record of one payload
pub fn load_entry(
    metadata_path: PathBuf,
    backup_path: PathBuf,
) -> Result<RecycleBinEntry, ParseFailure> {
    match metadata::read_metadata_file(&metadata_path) {
        Ok(record) => {
            tracing::trace!("Decoded {} ({})", metadata_path.display(), record.format);
            Ok(RecycleBinEntry::from_record(record, metadata_path, backup_path))
        }
        Err(cause) => Err(ParseFailure {
            metadata_path,
            cause,
        }),
    }
}
