//! Compiled-in schema

/// Bump whenever `CREATE_SCORES` changes. Opening a database recorded at any
/// other version drops the scores table and recreates it empty.
pub const SCHEMA_VERSION: i64 = 1;

/// Name of the only data table
pub const SCORES_TABLE: &str = "scores";

pub(crate) const CREATE_SCORES: &str = "CREATE TABLE IF NOT EXISTS scores (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    value INTEGER
)";

pub(crate) const DROP_SCORES: &str = "DROP TABLE IF EXISTS scores";

pub(crate) const CREATE_SCHEMA_VERSION: &str = "CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL
)";

/// Columns `CREATE_SCORES` produces, in declaration order
pub(crate) const SCORES_COLUMNS: [&str; 3] = ["id", "name", "value"];
