//! Scorekeep Store - durable single-table persistence for scores
//!
//! Provides:
//! - SQLite connection management
//! - A versioned `scores` table with drop-and-recreate on version mismatch
//! - A repository of single-statement CRUD queries
//! - `ScoreStore`, the scoped handle callers open, use and close

pub mod config;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod store;

pub use config::{StoreConfig, StoreLocation, DEFAULT_DB_FILE};
pub use errors::Result;
pub use migrations::{SchemaOutcome, SCHEMA_VERSION};
pub use store::ScoreStore;
