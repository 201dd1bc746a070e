//! SQLite repository for the scores table
//!
//! Every function is exactly one statement, so each is atomic under
//! SQLite's own locking without an explicit transaction.

use crate::errors::{from_rusqlite, Result};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OptionalExtension, Row};
use scorekeep_core::{Score, ScoreDraft, ScoreId};

/// SQLite repository for scores
pub struct ScoreRepo;

impl ScoreRepo {
    /// Insert a draft and return the persisted record with its new id
    pub fn insert(conn: &Connection, draft: &ScoreDraft) -> Result<Score> {
        let score = conn
            .query_row(
                "INSERT INTO scores (name, value) VALUES (?1, ?2)
                 RETURNING id, name, value",
                rusqlite::params![draft.name, draft.value],
                score_from_row,
            )
            .map_err(from_rusqlite)?;

        tracing::debug!(score_id = score.id.get(), "inserted score row");
        Ok(score)
    }

    /// Get a score by id
    pub fn get(conn: &Connection, id: ScoreId) -> Result<Option<Score>> {
        conn.query_row(
            "SELECT id, name, value FROM scores WHERE id = ?1",
            [id.get()],
            score_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// All scores, highest value first; equal values keep insertion order
    pub fn list_by_value_desc(conn: &Connection) -> Result<Vec<Score>> {
        let mut stmt = conn
            .prepare("SELECT id, name, value FROM scores ORDER BY value DESC, id ASC")
            .map_err(from_rusqlite)?;

        let scores = stmt
            .query_map([], score_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(scores)
    }

    /// Overwrite name and value of an existing row
    ///
    /// Returns `None` when no row has this id.
    pub fn update(conn: &Connection, id: ScoreId, draft: &ScoreDraft) -> Result<Option<Score>> {
        conn.query_row(
            "UPDATE scores SET name = ?1, value = ?2 WHERE id = ?3
             RETURNING id, name, value",
            rusqlite::params![draft.name, draft.value, id.get()],
            score_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Delete a row, reporting whether one was removed
    pub fn delete(conn: &Connection, id: ScoreId) -> Result<bool> {
        let removed = conn
            .execute("DELETE FROM scores WHERE id = ?1", [id.get()])
            .map_err(from_rusqlite)?;
        Ok(removed > 0)
    }

    /// Number of stored scores
    pub fn count(conn: &Connection) -> Result<usize> {
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM scores", [], |row| row.get(0))
            .map_err(from_rusqlite)?;
        Ok(count.max(0) as usize)
    }
}

/// Rows written by this crate always hold TEXT names and INTEGER values.
/// Anything else came from an external writer and is read leniently: NULL
/// becomes an empty name or zero, and invalid UTF-8 is replaced rather than
/// failing the whole query.
fn score_from_row(row: &Row<'_>) -> rusqlite::Result<Score> {
    let id: i64 = row.get(0)?;
    let name = match row.get_ref(1)? {
        ValueRef::Null => String::new(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Integer(n) => n.to_string(),
        ValueRef::Real(f) => f.to_string(),
    };
    let value = match row.get_ref(2)? {
        ValueRef::Integer(n) => n,
        ValueRef::Real(f) => f as i64,
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|text| text.trim().parse().ok())
            .unwrap_or_default(),
        ValueRef::Null | ValueRef::Blob(_) => 0,
    };

    Ok(Score::from_draft(ScoreId::new(id), ScoreDraft::new(name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::ensure_schema;

    fn setup() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        ensure_schema(&mut conn, 1).unwrap();
        conn
    }

    #[test]
    fn test_insert_returns_persisted_record() {
        let conn = setup();
        let score = ScoreRepo::insert(&conn, &ScoreDraft::new("Alice", 10)).unwrap();
        assert_eq!(score.name, "Alice");
        assert_eq!(score.value, 10);
        assert_eq!(ScoreRepo::get(&conn, score.id).unwrap(), Some(score));
    }

    #[test]
    fn test_update_missing_row_is_none() {
        let conn = setup();
        let updated = ScoreRepo::update(&conn, ScoreId::new(99), &ScoreDraft::new("x", 1)).unwrap();
        assert!(updated.is_none());
        assert_eq!(ScoreRepo::count(&conn).unwrap(), 0);
    }

    #[test]
    fn test_null_cells_read_as_defaults() {
        let conn = setup();
        conn.execute("INSERT INTO scores (name, value) VALUES (NULL, NULL)", [])
            .unwrap();

        let all = ScoreRepo::list_by_value_desc(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "");
        assert_eq!(all[0].value, 0);
    }

    #[test]
    fn test_invalid_utf8_name_does_not_fail_list() {
        let conn = setup();
        ScoreRepo::insert(&conn, &ScoreDraft::new("Alice", 10)).unwrap();
        conn.execute(
            "INSERT INTO scores (name, value) VALUES (CAST(X'41FF42' AS TEXT), 3)",
            [],
        )
        .unwrap();

        let all = ScoreRepo::list_by_value_desc(&conn).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Alice");
        assert_eq!(all[1].name, "A\u{FFFD}B");
        assert_eq!(all[1].value, 3);
    }

    #[test]
    fn test_equal_values_keep_insertion_order() {
        let conn = setup();
        let first = ScoreRepo::insert(&conn, &ScoreDraft::new("first", 5)).unwrap();
        let second = ScoreRepo::insert(&conn, &ScoreDraft::new("second", 5)).unwrap();
        let top = ScoreRepo::insert(&conn, &ScoreDraft::new("top", 9)).unwrap();

        let ids: Vec<ScoreId> = ScoreRepo::list_by_value_desc(&conn)
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![top.id, first.id, second.id]);
    }
}
