//! Schema versioning for the scores table
//!
//! Provides:
//! - The compiled-in table definition and its version tag
//! - Checksums that detect drift between the recorded and compiled schema
//! - `ensure_schema`, run once per open

mod checksums;
mod embedded;
mod runner;

pub use embedded::{SCHEMA_VERSION, SCORES_TABLE};
pub use runner::{ensure_schema, SchemaOutcome};
