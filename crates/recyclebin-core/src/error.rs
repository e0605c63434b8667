use std::path::PathBuf;

use thiserror::Error;

use crate::metadata::MetadataError;

/// Errors returned by recycle bin operations
#[derive(Debug, Error)]
pub enum RecycleBinError {
    #[error("no recycle bin directory exists for identity {identity} on any volume")]
    NoTrashDirectory { identity: String },

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("entry path {} is not inside a managed recycle bin directory", .path.display())]
    InvalidEntry { path: PathBuf },

    #[error("no recycle bin entry found for {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("cannot restore to {}: destination already exists", .path.display())]
    RestoreConflict { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RecycleBinError>;

/// A metadata record that could not be turned into an entry.
///
/// Produced once per bad record during enumeration. It never aborts the
/// enumeration it came from.
#[derive(Debug, Error)]
#[error("failed to parse {}: {cause}", .metadata_path.display())]
pub struct ParseFailure {
    pub metadata_path: PathBuf,
    #[source]
    pub cause: MetadataError,
}

impl ParseFailure {
    pub fn new(metadata_path: impl Into<PathBuf>, cause: impl Into<MetadataError>) -> Self {
        Self {
            metadata_path: metadata_path.into(),
            cause: cause.into(),
        }
    }
}
