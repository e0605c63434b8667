//! `$I` metadata record parsing
//!
//! Every recycled item has a small binary record describing where it came
//! from and when it was deleted. Two layouts exist:
//!
//! - Legacy (version 1): fixed 544 bytes, the path lives in a 520-byte
//!   NUL-padded UTF-16LE buffer at offset 24
//! - Modern (version 2): variable length, a u32 character count at offset 24
//!   (including the terminating NUL) followed by the UTF-16LE path
//!
//! Both share the 24-byte prefix: version (u64), original size (u64) and
//! deletion file-time (i64), all little-endian.

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Utc};
use encoding_rs::UTF_16LE;
use serde::{Deserialize, Serialize};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod filetime;

pub use filetime::{datetime_to_filetime, filetime_to_datetime};

use crate::fs::ops;

/// Bytes shared by both layouts: version, original size, deletion time
pub const COMMON_HEADER_LEN: usize = 24;

/// Total size of a legacy record
pub const LEGACY_RECORD_LEN: usize = 544;

/// Offset and size of the legacy path buffer
pub const LEGACY_PATH_OFFSET: usize = 24;
pub const LEGACY_PATH_BYTES: usize = 520;

/// Offset of the modern character count and path
pub const MODERN_COUNT_OFFSET: usize = 24;
pub const MODERN_PATH_OFFSET: usize = 28;

/// Header versions written by the encoder
pub const LEGACY_VERSION: u64 = 1;
pub const MODERN_VERSION: u64 = 2;

/// On-disk layout of a metadata record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordFormat {
    Legacy,
    Modern,
}

impl std::fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordFormat::Legacy => write!(f, "legacy"),
            RecordFormat::Modern => write!(f, "modern"),
        }
    }
}

/// Decoded contents of a metadata record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    /// Declared payload size in bytes
    pub original_size: u64,
    pub deleted_at: DateTime<Utc>,
    pub original_path: PathBuf,
    pub format: RecordFormat,
}

/// Why a metadata record could not be decoded
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("record truncated: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },

    #[error("path character count {count} does not fit the {available} bytes after the header")]
    InvalidCharCount { count: u32, available: usize },

    #[error("deletion time {0} is not a valid file-time")]
    InvalidTimestamp(i64),

    #[error("deletion time {0} cannot be written as a file-time")]
    UnrepresentableTimestamp(DateTime<Utc>),

    #[error("invalid original path: {0}")]
    InvalidPath(String),

    #[error("path needs {units} UTF-16 units, legacy records hold at most {max}")]
    PathTooLong { units: usize, max: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Pick the layout for a record.
///
/// A record is modern unless it is exactly 544 bytes long and the count at
/// offset 24 would make a modern path occupy exactly the remaining 516 bytes.
/// A modern record of that exact shape is therefore read as legacy; this
/// ambiguity is inherent to the format and kept as-is.
pub fn detect_format(data: &[u8]) -> RecordFormat {
    if data.len() == LEGACY_RECORD_LEN {
        let count = LittleEndian::read_u32(&data[MODERN_COUNT_OFFSET..MODERN_PATH_OFFSET]);
        if u64::from(count) * 2 == (LEGACY_RECORD_LEN - MODERN_PATH_OFFSET) as u64 {
            return RecordFormat::Legacy;
        }
    }
    RecordFormat::Modern
}

/// Decode a metadata record.
///
/// A 544-byte record that fails to decode as modern is retried as legacy,
/// since legacy records almost never carry a plausible modern count.
pub fn decode(data: &[u8]) -> Result<MetadataRecord, MetadataError> {
    match detect_format(data) {
        RecordFormat::Legacy => decode_legacy(data),
        RecordFormat::Modern => match decode_modern(data) {
            Err(err) if data.len() == LEGACY_RECORD_LEN => {
                tracing::debug!("Modern decode of 544-byte record failed ({}), reading as legacy", err);
                decode_legacy(data)
            }
            result => result,
        },
    }
}

/// Read and decode the metadata file at `path`
pub fn read_metadata_file(path: &Path) -> Result<MetadataRecord, MetadataError> {
    let data = ops::read_record(path)?;
    decode(&data)
}

/// Decode a record as the fixed 544-byte legacy layout
pub fn decode_legacy(data: &[u8]) -> Result<MetadataRecord, MetadataError> {
    let end = LEGACY_PATH_OFFSET + LEGACY_PATH_BYTES;
    if data.len() < end {
        return Err(MetadataError::Truncated {
            needed: end,
            actual: data.len(),
        });
    }

    let (original_size, deleted_at) = read_common_header(data)?;

    // Path stops at the first NUL; the rest of the buffer is padding
    let buffer = &data[LEGACY_PATH_OFFSET..end];
    let len = buffer
        .chunks_exact(2)
        .position(|unit| unit == [0, 0])
        .map_or(buffer.len(), |units| units * 2);
    let original_path = decode_utf16_path(&buffer[..len])?;

    Ok(MetadataRecord {
        original_size,
        deleted_at,
        original_path,
        format: RecordFormat::Legacy,
    })
}

/// Decode a record as the variable-length modern layout
pub fn decode_modern(data: &[u8]) -> Result<MetadataRecord, MetadataError> {
    if data.len() < MODERN_PATH_OFFSET {
        return Err(MetadataError::Truncated {
            needed: MODERN_PATH_OFFSET,
            actual: data.len(),
        });
    }

    let (original_size, deleted_at) = read_common_header(data)?;

    // The count includes the terminating NUL
    let count = LittleEndian::read_u32(&data[MODERN_COUNT_OFFSET..MODERN_PATH_OFFSET]);
    let available = data.len() - MODERN_PATH_OFFSET;
    let path_bytes = (count as usize)
        .checked_sub(1)
        .and_then(|units| units.checked_mul(2))
        .filter(|&bytes| bytes <= available)
        .ok_or(MetadataError::InvalidCharCount { count, available })?;

    let buffer = &data[MODERN_PATH_OFFSET..MODERN_PATH_OFFSET + path_bytes];
    if buffer.chunks_exact(2).any(|unit| unit == [0, 0]) {
        return Err(MetadataError::InvalidPath("embedded NUL character".to_string()));
    }
    let original_path = decode_utf16_path(buffer)?;

    Ok(MetadataRecord {
        original_size,
        deleted_at,
        original_path,
        format: RecordFormat::Modern,
    })
}

fn read_common_header(data: &[u8]) -> Result<(u64, DateTime<Utc>), MetadataError> {
    let mut cursor = Cursor::new(data);

    let _version = cursor.read_u64::<LittleEndian>()?;
    let original_size = cursor.read_u64::<LittleEndian>()?;
    let filetime = cursor.read_i64::<LittleEndian>()?;

    let deleted_at =
        filetime_to_datetime(filetime).ok_or(MetadataError::InvalidTimestamp(filetime))?;
    Ok((original_size, deleted_at))
}

fn decode_utf16_path(data: &[u8]) -> Result<PathBuf, MetadataError> {
    let decoded = UTF_16LE
        .decode_without_bom_handling_and_without_replacement(data)
        .ok_or_else(|| MetadataError::InvalidPath("malformed UTF-16".to_string()))?;

    if decoded.is_empty() {
        return Err(MetadataError::InvalidPath("empty path".to_string()));
    }

    Ok(PathBuf::from(decoded.into_owned()))
}

impl MetadataRecord {
    /// Serialize the record in its own layout, byte-for-byte as the OS writes it
    pub fn encode(&self) -> Result<Vec<u8>, MetadataError> {
        let path = self.original_path.to_str().ok_or_else(|| {
            MetadataError::InvalidPath(format!("{} is not valid Unicode", self.original_path.display()))
        })?;
        let units: Vec<u16> = path.encode_utf16().collect();
        let filetime = datetime_to_filetime(self.deleted_at)
            .ok_or(MetadataError::UnrepresentableTimestamp(self.deleted_at))?;

        let version = match self.format {
            RecordFormat::Legacy => LEGACY_VERSION,
            RecordFormat::Modern => MODERN_VERSION,
        };

        let mut out = Vec::with_capacity(MODERN_PATH_OFFSET + (units.len() + 1) * 2);
        out.write_u64::<LittleEndian>(version)?;
        out.write_u64::<LittleEndian>(self.original_size)?;
        out.write_i64::<LittleEndian>(filetime)?;

        match self.format {
            RecordFormat::Legacy => {
                let max = LEGACY_PATH_BYTES / 2;
                if units.len() + 1 > max {
                    return Err(MetadataError::PathTooLong {
                        units: units.len() + 1,
                        max,
                    });
                }
                for unit in &units {
                    out.write_u16::<LittleEndian>(*unit)?;
                }
                out.resize(LEGACY_RECORD_LEN, 0);
            }
            RecordFormat::Modern => {
                out.write_u32::<LittleEndian>(units.len() as u32 + 1)?;
                for unit in &units {
                    out.write_u16::<LittleEndian>(*unit)?;
                }
                out.write_u16::<LittleEndian>(0)?;
            }
        }

        Ok(out)
    }
}
