//! Scorekeep Core - domain model, validation, errors and logging
//!
//! This crate provides the pieces shared by the store and its callers:
//! - `Score`, `ScoreDraft` and `ScoreId` model types
//! - Validation of raw form input into drafts
//! - The canonical structured error facility
//! - The structured logging facility and its operation macros

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod rules;
pub mod schema;

pub use errors::{ExError, ExErrorKind, Result, ScoreInputError};
pub use model::{Score, ScoreDraft, ScoreId};
