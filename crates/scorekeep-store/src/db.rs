//! Database connection management
//!
//! Provides utilities for opening and configuring SQLite connections

use crate::config::{StoreConfig, StoreLocation};
use crate::errors::{from_rusqlite, io_error, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Open and configure the connection a config points at
pub fn connect(config: &StoreConfig) -> Result<Connection> {
    let conn = match &config.location {
        StoreLocation::File(path) => {
            if config.create_parent_dirs {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| io_error("create_db_dir", e))?;
                }
            }
            let conn = open(path)?;
            configure(&conn)?;
            conn
        }
        StoreLocation::InMemory => open_in_memory()?,
    };
    Ok(conn)
}

/// Configure a file-backed connection
pub fn configure(conn: &Connection) -> Result<()> {
    // journal_mode returns a row, so it cannot go through execute()
    conn.execute_batch("PRAGMA journal_mode = WAL;")
        .map_err(from_rusqlite)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let conn = open_in_memory().unwrap();
        let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0)).unwrap();
        assert_eq!(one, 1);
    }

    #[test]
    fn test_connect_creates_parent_dirs_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("scores.db");

        let config = StoreConfig::file(&path).with_create_parent_dirs(true);
        let conn = connect(&config).unwrap();
        drop(conn);

        assert!(path.exists());
    }

    #[test]
    fn test_connect_missing_dir_is_hard_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("scores.db");

        let err = connect(&StoreConfig::file(&path)).unwrap_err();
        assert_eq!(err.kind(), scorekeep_core::ExErrorKind::Io);
    }
}
