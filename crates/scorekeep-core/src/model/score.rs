use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Store-assigned identifier of a persisted score
///
/// Assigned once on insert and never reused, even after the row holding
/// it is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreId(i64);

impl ScoreId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ScoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ScoreId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A score that has not been persisted yet
///
/// This is also the editable part of a persisted [`Score`]: updates submit a
/// draft against an existing id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDraft {
    /// Free-form label; no length limit, no uniqueness
    pub name: String,

    pub value: i64,
}

impl ScoreDraft {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A persisted score record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub id: ScoreId,
    pub name: String,
    pub value: i64,
}

impl Score {
    /// Attach a store-assigned id to a draft
    pub fn from_draft(id: ScoreId, draft: ScoreDraft) -> Self {
        Self {
            id,
            name: draft.name,
            value: draft.value,
        }
    }

    /// Leaderboard ordering: highest value first, ties by ascending id
    pub fn cmp_by_value_desc(&self, other: &Score) -> Ordering {
        other
            .value
            .cmp(&self.value)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_name_then_value() {
        let score = Score::from_draft(ScoreId::new(1), ScoreDraft::new("Alice", 10));
        assert_eq!(score.to_string(), "Alice 10");
    }

    #[test]
    fn test_cmp_by_value_desc_breaks_ties_by_id() {
        let mut scores = vec![
            Score::from_draft(ScoreId::new(3), ScoreDraft::new("c", 5)),
            Score::from_draft(ScoreId::new(1), ScoreDraft::new("a", 10)),
            Score::from_draft(ScoreId::new(2), ScoreDraft::new("b", 5)),
        ];
        scores.sort_by(Score::cmp_by_value_desc);

        let ids: Vec<i64> = scores.iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_score_id_serializes_transparently() {
        let score = Score::from_draft(ScoreId::new(4), ScoreDraft::new("Dee", -3));
        let json = serde_json::to_string(&score).unwrap();
        assert_eq!(json, r#"{"id":4,"name":"Dee","value":-3}"#);
    }

    #[test]
    fn test_score_id_from_str() {
        assert_eq!(" 12 ".parse::<ScoreId>().unwrap(), ScoreId::new(12));
        assert!("twelve".parse::<ScoreId>().is_err());
    }
}
