//! Version types for schema compatibility.

use serde::{Deserialize, Serialize};

/// Schema version using semantic versioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version (breaking changes)
    pub major: u16,
    /// Minor version (backwards-compatible additions)
    pub minor: u16,
    /// Patch version (bug fixes)
    pub patch: u16,
}

impl SchemaVersion {
    /// Creates a new schema version.
    #[must_use]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Current workspace document version.
    pub const WORKSPACE_FILE: Self = Self::new(1, 0, 0);

    /// Checks if this version can read data from another version.
    #[must_use]
    pub const fn can_read(&self, data_version: &Self) -> bool {
        self.major == data_version.major
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::WORKSPACE_FILE
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
