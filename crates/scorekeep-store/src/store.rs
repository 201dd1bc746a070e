//! Score store handle with boundary logging
//!
//! `ScoreStore` owns the only connection to the scores database for as long
//! as it lives. Opening it acquires the connection and brings the schema to
//! the configured version; closing (or dropping) it releases the connection.
//! Every operation runs synchronously on the caller's thread.
//!
//! ## Logging Ownership
//!
//! This layer owns lifecycle logging for store operations:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! The repository and schema runner use only `tracing::debug!()` and
//! `tracing::warn!()` for internal details.

use std::time::Instant;

use rusqlite::Connection;
use scorekeep_core::{log_op_end, log_op_error, log_op_start};
use scorekeep_core::{Score, ScoreDraft, ScoreId};

use crate::config::StoreConfig;
use crate::db;
use crate::errors::{from_rusqlite, Result};
use crate::migrations::{ensure_schema, SchemaOutcome};
use crate::repo::ScoreRepo;

/// Open handle to the scores table
pub struct ScoreStore {
    conn: Connection,
    schema: SchemaOutcome,
}

impl std::fmt::Debug for ScoreStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreStore")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl ScoreStore {
    /// Acquire the database and ensure the scores table exists at the
    /// configured version
    ///
    /// ## Errors
    ///
    /// - `Io`: the database file cannot be opened or its directory created
    /// - `Persistence`: the schema could not be created or rebuilt
    /// - `ConstraintViolation`: the recorded schema checksum does not match
    pub fn open(config: &StoreConfig) -> Result<Self> {
        log_op_start!(
            "store_open",
            schema_version = config.schema_version,
            location = ?config.location
        );
        let start = Instant::now();

        let result = Self::open_impl(config).map_err(|e| {
            log_op_error!(
                "store_open",
                &e,
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "store_open",
            duration_ms = start.elapsed().as_millis() as u64,
            schema = ?result.schema,
            schema_version = result.schema.version(),
            discarded_rows = result.schema.discarded_rows()
        );

        Ok(result)
    }

    fn open_impl(config: &StoreConfig) -> Result<Self> {
        let mut conn = db::connect(config)?;
        let schema = ensure_schema(&mut conn, config.schema_version)?;
        Ok(Self { conn, schema })
    }

    /// What happened to the schema when this handle was opened
    pub fn schema_outcome(&self) -> SchemaOutcome {
        self.schema
    }

    /// Release the connection, reporting any failure to close it cleanly
    ///
    /// Dropping the store also releases the connection but swallows close
    /// errors.
    pub fn close(self) -> Result<()> {
        log_op_start!("store_close");
        let start = Instant::now();

        self.conn.close().map_err(|(_, e)| {
            let e = from_rusqlite(e);
            log_op_error!(
                "store_close",
                &e,
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "store_close",
            duration_ms = start.elapsed().as_millis() as u64
        );
        Ok(())
    }

    /// Persist a new score
    ///
    /// ## Returns
    ///
    /// The stored record including its newly assigned id
    ///
    /// ## Errors
    ///
    /// - `Persistence`: the insert did not take place
    pub fn create(&self, draft: &ScoreDraft) -> Result<Score> {
        log_op_start!("score_create", value = draft.value);
        let start = Instant::now();

        let result = ScoreRepo::insert(&self.conn, draft).map_err(|e| {
            log_op_error!(
                "score_create",
                &e,
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "score_create",
            duration_ms = start.elapsed().as_millis() as u64,
            score_id = result.id.get()
        );

        Ok(result)
    }

    /// Look up one score; `None` when the id is not stored
    ///
    /// ## Errors
    ///
    /// - `Persistence`: database error
    pub fn get(&self, id: ScoreId) -> Result<Option<Score>> {
        log_op_start!("score_get", score_id = id.get());
        let start = Instant::now();

        let result = ScoreRepo::get(&self.conn, id).map_err(|e| {
            log_op_error!(
                "score_get",
                &e,
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "score_get",
            duration_ms = start.elapsed().as_millis() as u64,
            found = result.is_some()
        );

        Ok(result)
    }

    /// Every stored score, highest value first
    ///
    /// Scores with equal values come back in insertion order. The list is
    /// read fresh on every call; callers re-invoke it after a mutation to
    /// see the new state.
    ///
    /// ## Errors
    ///
    /// - `Persistence`: database error
    pub fn list(&self) -> Result<Vec<Score>> {
        log_op_start!("score_list");
        let start = Instant::now();

        let result = ScoreRepo::list_by_value_desc(&self.conn).map_err(|e| {
            log_op_error!(
                "score_list",
                &e,
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "score_list",
            duration_ms = start.elapsed().as_millis() as u64,
            row_count = result.len() as u64
        );

        Ok(result)
    }

    /// Overwrite the name and value of a stored score
    ///
    /// The id never changes.
    ///
    /// ## Returns
    ///
    /// The updated record, or `None` when no score has this id
    ///
    /// ## Errors
    ///
    /// - `Persistence`: database error
    pub fn update(&self, id: ScoreId, draft: &ScoreDraft) -> Result<Option<Score>> {
        log_op_start!("score_update", score_id = id.get(), value = draft.value);
        let start = Instant::now();

        let result = ScoreRepo::update(&self.conn, id, draft).map_err(|e| {
            log_op_error!(
                "score_update",
                &e,
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "score_update",
            duration_ms = start.elapsed().as_millis() as u64,
            found = result.is_some()
        );

        Ok(result)
    }

    /// Remove a score
    ///
    /// ## Returns
    ///
    /// `true` if a row was removed, `false` if the id was not stored
    ///
    /// ## Errors
    ///
    /// - `Persistence`: database error
    pub fn delete(&self, id: ScoreId) -> Result<bool> {
        log_op_start!("score_delete", score_id = id.get());
        let start = Instant::now();

        let result = ScoreRepo::delete(&self.conn, id).map_err(|e| {
            log_op_error!(
                "score_delete",
                &e,
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "score_delete",
            duration_ms = start.elapsed().as_millis() as u64,
            removed = result
        );

        Ok(result)
    }

    /// Number of stored scores
    ///
    /// ## Errors
    ///
    /// - `Persistence`: database error
    pub fn count(&self) -> Result<usize> {
        ScoreRepo::count(&self.conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_creates_schema() {
        let store = ScoreStore::open(&StoreConfig::in_memory()).unwrap();
        assert_eq!(
            store.schema_outcome(),
            SchemaOutcome::Created {
                version: crate::SCHEMA_VERSION
            }
        );
        assert_eq!(store.count().unwrap(), 0);
        store.close().unwrap();
    }

    #[test]
    fn test_debug_hides_connection() {
        let store = ScoreStore::open(&StoreConfig::in_memory()).unwrap();
        let rendered = format!("{:?}", store);
        assert!(rendered.starts_with("ScoreStore"));
        assert!(rendered.contains("Created"));
    }
}
