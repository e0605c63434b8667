//! Volume enumeration
use std::io;
use std::path::PathBuf;

/// Source of mounted volume roots, in a stable order
pub trait VolumeSource {
    fn volumes(&self) -> io::Result<Vec<PathBuf>>;
}

/// Volumes mounted on this machine.
///
/// Windows: every drive letter whose root exists. Elsewhere: `/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemVolumes;

impl VolumeSource for SystemVolumes {
    #[cfg(windows)]
    fn volumes(&self) -> io::Result<Vec<PathBuf>> {
        Ok((b'A'..=b'Z')
            .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
            .filter(|root| root.is_dir())
            .collect())
    }

    #[cfg(not(windows))]
    fn volumes(&self) -> io::Result<Vec<PathBuf>> {
        Ok(vec![PathBuf::from("/")])
    }
}

/// An explicit list of volume roots
#[derive(Debug, Clone, Default)]
pub struct FixedVolumes {
    roots: Vec<PathBuf>,
}

impl FixedVolumes {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }
}

impl VolumeSource for FixedVolumes {
    fn volumes(&self) -> io::Result<Vec<PathBuf>> {
        Ok(self.roots.clone())
    }
}
