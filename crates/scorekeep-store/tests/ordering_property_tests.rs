// Property tests for list ordering and id assignment

use proptest::prelude::*;
use scorekeep_core::{Score, ScoreDraft};
use scorekeep_store::{ScoreStore, StoreConfig};
use std::collections::HashSet;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_list_is_value_descending(values in prop::collection::vec(any::<i64>(), 0..40)) {
        let store = ScoreStore::open(&StoreConfig::in_memory()).unwrap();
        for (i, value) in values.iter().enumerate() {
            store.create(&ScoreDraft::new(format!("p{}", i), *value)).unwrap();
        }

        let listed = store.list().unwrap();
        prop_assert_eq!(listed.len(), values.len());

        let mut expected = listed.clone();
        expected.sort_by(Score::cmp_by_value_desc);
        prop_assert_eq!(listed, expected);
    }

    #[test]
    fn prop_ids_unique_under_interleaved_deletes(
        ops in prop::collection::vec((any::<i32>(), any::<bool>()), 1..40)
    ) {
        let store = ScoreStore::open(&StoreConfig::in_memory()).unwrap();
        let mut seen = HashSet::new();

        for (value, delete_after) in ops {
            let score = store.create(&ScoreDraft::new("x", i64::from(value))).unwrap();
            prop_assert!(seen.insert(score.id), "id {} was reused", score.id);
            if delete_after {
                prop_assert!(store.delete(score.id).unwrap());
            }
        }
    }
}
