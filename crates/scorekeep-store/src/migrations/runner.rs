//! Schema runner
//!
//! Compares the recorded version and the live table layout with what this
//! build expects, then creates, keeps, repairs or rebuilds the scores table.

use crate::errors::{checksum_mismatch, from_rusqlite, schema_error, Result};
use crate::migrations::checksums::compute_checksum;
use crate::migrations::embedded::{
    CREATE_SCHEMA_VERSION, CREATE_SCORES, DROP_SCORES, SCORES_COLUMNS,
};
use rusqlite::{Connection, OptionalExtension, Transaction};

/// What `ensure_schema` did to the database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaOutcome {
    /// No version was recorded; the table was created (or an existing table
    /// with the expected columns was adopted)
    Created { version: i64 },
    /// The recorded version matched; nothing changed
    Current { version: i64 },
    /// The recorded version differed; the table was dropped and recreated
    Rebuilt {
        from: i64,
        to: i64,
        discarded_rows: u64,
    },
    /// The table was missing or its columns did not match the expected
    /// layout; it was dropped and recreated
    Repaired { version: i64, discarded_rows: u64 },
}

impl SchemaOutcome {
    /// Version of the scores table after the run
    pub fn version(&self) -> i64 {
        match *self {
            SchemaOutcome::Created { version }
            | SchemaOutcome::Current { version }
            | SchemaOutcome::Repaired { version, .. } => version,
            SchemaOutcome::Rebuilt { to, .. } => to,
        }
    }

    /// Rows lost while bringing the table to the current layout
    pub fn discarded_rows(&self) -> u64 {
        match *self {
            SchemaOutcome::Rebuilt { discarded_rows, .. }
            | SchemaOutcome::Repaired { discarded_rows, .. } => discarded_rows,
            SchemaOutcome::Created { .. } | SchemaOutcome::Current { .. } => 0,
        }
    }
}

/// Layout of the scores table as found on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableShape {
    Missing,
    Expected,
    Incompatible,
}

/// Bring the scores table to `target_version`
///
/// A version mismatch in either direction discards every stored score, as
/// does a scores table whose columns are not `id, name, value`. Rebuilds run
/// in one transaction, so a failure leaves the previous table and version in
/// place.
pub fn ensure_schema(conn: &mut Connection, target_version: i64) -> Result<SchemaOutcome> {
    conn.execute_batch(CREATE_SCHEMA_VERSION)
        .map_err(|e| schema_error("create_schema_version", &e.to_string()))?;

    let checksum = compute_checksum(CREATE_SCORES);
    let shape = scores_table_shape(conn)?;

    match (read_version_row(conn)?, shape) {
        (Some((recorded, _)), _) if recorded != target_version => {
            let discarded_rows = rebuild(conn, target_version, &checksum)?;
            tracing::warn!(
                from_version = recorded,
                to_version = target_version,
                discarded_rows,
                "schema version changed, scores table rebuilt and existing scores discarded"
            );
            Ok(SchemaOutcome::Rebuilt {
                from: recorded,
                to: target_version,
                discarded_rows,
            })
        }
        (Some((recorded, recorded_checksum)), _) if recorded_checksum != checksum => Err(
            checksum_mismatch(recorded, &checksum, &recorded_checksum),
        ),
        (Some((recorded, _)), TableShape::Expected) => {
            Ok(SchemaOutcome::Current { version: recorded })
        }
        (None, TableShape::Missing | TableShape::Expected) => {
            let tx = conn.transaction().map_err(from_rusqlite)?;
            tx.execute_batch(CREATE_SCORES)
                .map_err(|e| schema_error("create_scores", &e.to_string()))?;
            record_version(&tx, target_version, &checksum)?;
            tx.commit().map_err(from_rusqlite)?;

            tracing::debug!(version = target_version, ?shape, "created scores table");
            Ok(SchemaOutcome::Created {
                version: target_version,
            })
        }
        (_, shape) => {
            let discarded_rows = rebuild(conn, target_version, &checksum)?;
            tracing::warn!(
                version = target_version,
                ?shape,
                discarded_rows,
                "scores table layout did not match, table rebuilt and existing scores discarded"
            );
            Ok(SchemaOutcome::Repaired {
                version: target_version,
                discarded_rows,
            })
        }
    }
}

/// Drop and recreate the scores table, returning how many rows were lost
fn rebuild(conn: &mut Connection, target_version: i64, checksum: &str) -> Result<u64> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    let discarded_rows = count_rows(&tx)?;
    tx.execute_batch(DROP_SCORES)
        .map_err(|e| schema_error("drop_scores", &e.to_string()))?;
    tx.execute_batch(CREATE_SCORES)
        .map_err(|e| schema_error("create_scores", &e.to_string()))?;
    record_version(&tx, target_version, checksum)?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(discarded_rows)
}

fn scores_table_shape(conn: &Connection) -> Result<TableShape> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info('scores') ORDER BY cid")
        .map_err(from_rusqlite)?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    Ok(if columns.is_empty() {
        TableShape::Missing
    } else if columns == SCORES_COLUMNS {
        TableShape::Expected
    } else {
        TableShape::Incompatible
    })
}

fn read_version_row(conn: &Connection) -> Result<Option<(i64, String)>> {
    conn.query_row(
        "SELECT version, checksum FROM schema_version WHERE id = 1",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
    .map_err(from_rusqlite)
}

fn record_version(tx: &Transaction, version: i64, checksum: &str) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    tx.execute(
        "INSERT INTO schema_version (id, version, applied_at, checksum) VALUES (1, ?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET
            version = excluded.version,
            applied_at = excluded.applied_at,
            checksum = excluded.checksum",
        rusqlite::params![version, now, checksum],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}

fn count_rows(tx: &Transaction) -> Result<u64> {
    if scores_table_shape(tx)? == TableShape::Missing {
        return Ok(0);
    }
    let count: i64 = tx
        .query_row("SELECT COUNT(*) FROM scores", [], |row| row.get(0))
        .map_err(from_rusqlite)?;
    Ok(count.max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorded(conn: &Connection) -> Option<i64> {
        read_version_row(conn).unwrap().map(|(version, _)| version)
    }

    #[test]
    fn test_fresh_database_is_created() {
        let mut conn = Connection::open_in_memory().unwrap();
        let outcome = ensure_schema(&mut conn, 1).unwrap();
        assert_eq!(outcome, SchemaOutcome::Created { version: 1 });
        assert_eq!(recorded(&conn), Some(1));
        assert_eq!(scores_table_shape(&conn).unwrap(), TableShape::Expected);
    }

    #[test]
    fn test_idempotency() {
        let mut conn = Connection::open_in_memory().unwrap();
        ensure_schema(&mut conn, 1).unwrap();
        let outcome = ensure_schema(&mut conn, 1).unwrap();
        assert_eq!(outcome, SchemaOutcome::Current { version: 1 });
    }

    #[test]
    fn test_version_change_rebuilds_and_counts_discarded_rows() {
        let mut conn = Connection::open_in_memory().unwrap();
        ensure_schema(&mut conn, 1).unwrap();
        conn.execute_batch("INSERT INTO scores (name, value) VALUES ('a', 1), ('b', 2);")
            .unwrap();

        let outcome = ensure_schema(&mut conn, 2).unwrap();
        assert_eq!(
            outcome,
            SchemaOutcome::Rebuilt {
                from: 1,
                to: 2,
                discarded_rows: 2
            }
        );
        assert_eq!(outcome.version(), 2);
        assert_eq!(outcome.discarded_rows(), 2);

        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM scores", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_unversioned_table_with_expected_columns_is_adopted() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE scores (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, value INTEGER);
             INSERT INTO scores (name, value) VALUES ('kept', 3);",
        )
        .unwrap();

        let outcome = ensure_schema(&mut conn, 1).unwrap();
        assert_eq!(outcome, SchemaOutcome::Created { version: 1 });

        let kept: i64 = conn
            .query_row("SELECT COUNT(*) FROM scores", [], |row| row.get(0))
            .unwrap();
        assert_eq!(kept, 1);
    }

    #[test]
    fn test_shape_detects_foreign_columns() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(scores_table_shape(&conn).unwrap(), TableShape::Missing);

        conn.execute_batch("CREATE TABLE scores (_id INTEGER PRIMARY KEY, name TEXT, score INTEGER)")
            .unwrap();
        assert_eq!(scores_table_shape(&conn).unwrap(), TableShape::Incompatible);
    }
}
