//! Validation of raw form input
//!
//! Score values arrive as free text. Anything that is not a base-10 integer
//! is rejected instead of being coerced to a default.

use std::num::IntErrorKind;

use crate::errors::{Result, ScoreInputError};
use crate::model::ScoreDraft;

/// Parse the text of a score value field
///
/// Surrounding whitespace is ignored. A leading `+` or `-` sign is accepted.
///
/// # Errors
/// Returns [`ScoreInputError`] when the text is empty, not an integer, or
/// outside the `i64` range.
pub fn parse_score_value(text: &str) -> std::result::Result<i64, ScoreInputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ScoreInputError::EmptyValue);
    }

    trimmed.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ScoreInputError::OutOfRange {
            input: trimmed.to_string(),
        },
        _ => ScoreInputError::NotAnInteger {
            input: trimmed.to_string(),
        },
    })
}

impl ScoreDraft {
    /// Build a draft from the two raw form fields
    ///
    /// The name is taken verbatim; it may be empty.
    ///
    /// # Errors
    /// Returns an `InvalidInput` error when `value_text` is not a valid score.
    pub fn parse(name: impl Into<String>, value_text: &str) -> Result<Self> {
        let value = parse_score_value(value_text)?;
        Ok(ScoreDraft::new(name, value))
    }
}
