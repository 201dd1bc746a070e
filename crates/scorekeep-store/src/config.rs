//! Store configuration

use std::path::{Path, PathBuf};

use crate::migrations::SCHEMA_VERSION;

/// File name used when no path is configured
pub const DEFAULT_DB_FILE: &str = "scores.db";

/// Where the scores table lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A database file on disk
    File(PathBuf),
    /// A private in-memory database, discarded on close
    InMemory,
}

/// Settings applied when a `ScoreStore` is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: StoreLocation,

    /// Version the scores table must have after open; a different recorded
    /// version rebuilds the table empty
    pub schema_version: i64,

    /// Create missing parent directories of a file location
    pub create_parent_dirs: bool,
}

impl StoreConfig {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            location: StoreLocation::File(path.as_ref().to_path_buf()),
            schema_version: SCHEMA_VERSION,
            create_parent_dirs: false,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::InMemory,
            schema_version: SCHEMA_VERSION,
            create_parent_dirs: false,
        }
    }

    pub fn with_schema_version(mut self, version: i64) -> Self {
        self.schema_version = version;
        self
    }

    pub fn with_create_parent_dirs(mut self, create: bool) -> Self {
        self.create_parent_dirs = create;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::file(DEFAULT_DB_FILE)
    }
}
