//! Identity of the account that owns a recycle bin directory
use std::fmt;
use std::str::FromStr;

use crate::error::RecycleBinError;

/// Opaque account token, usually a security identifier such as
/// `S-1-5-21-1004336348-1177238915-682003330-1001`.
///
/// The token becomes a directory name, so anything that could walk out of
/// the bin directory is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn new(token: impl Into<String>) -> Result<Self, RecycleBinError> {
        let token = token.into();

        if token.is_empty() {
            return Err(RecycleBinError::InvalidIdentity("empty identity".to_string()));
        }
        if token == "." || token == ".." {
            return Err(RecycleBinError::InvalidIdentity(format!("'{}' is not a directory name", token)));
        }
        if token.contains(['/', '\\', ':', '\0']) {
            return Err(RecycleBinError::InvalidIdentity(format!(
                "'{}' contains a path separator or NUL",
                token.escape_debug()
            )));
        }

        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identity {
    type Err = RecycleBinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
