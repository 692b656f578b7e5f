//! Property-based tests for `AvlTreeMap`.
//!
//! These tests verify that `AvlTreeMap` satisfies the expected laws and
//! invariants using proptest, including a model check against the standard
//! library's `BTreeMap`.

use arbora::persistent::AvlTreeMap;
use proptest::prelude::*;
use std::collections::BTreeMap;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

/// Strategy for generating an `AvlTreeMap` from a vector of key-value pairs.
fn arbitrary_treemap(max_size: usize) -> impl Strategy<Value = AvlTreeMap<i32, i32>> {
    prop::collection::vec((any::<i32>(), any::<i32>()), 0..max_size)
        .prop_map(|entries| entries.into_iter().collect::<AvlTreeMap<i32, i32>>())
}

// =============================================================================
// Get-Insert Laws
// =============================================================================

proptest! {
    /// Law: get after insert returns the inserted value.
    /// map.insert(key, value).get(&key) == Some(&value)
    #[test]
    fn prop_get_insert_law(map in arbitrary_treemap(20), key: i32, value: i32) {
        let updated = map.insert(key, value);
        prop_assert_eq!(updated.get(&key), Some(&value));
    }

    /// Law: insert does not affect other keys.
    /// key1 != key2 => map.insert(key1, value).get(&key2) == map.get(&key2)
    #[test]
    fn prop_get_insert_other_law(
        map in arbitrary_treemap(20),
        key1: i32,
        key2: i32,
        value: i32
    ) {
        prop_assume!(key1 != key2);
        let updated = map.insert(key1, value);
        prop_assert_eq!(updated.get(&key2), map.get(&key2));
    }

    /// Law: inserting never changes the original version.
    #[test]
    fn prop_insert_preserves_original(map in arbitrary_treemap(20), key: i32, value: i32) {
        let before: Vec<(i32, i32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        let _updated = map.insert(key, value);
        let after: Vec<(i32, i32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(before, after);
    }
}

// =============================================================================
// Remove Laws
// =============================================================================

proptest! {
    /// Law: get after remove returns None.
    /// map.remove(&key).get(&key) == None
    #[test]
    fn prop_get_remove_law(map in arbitrary_treemap(20), key: i32) {
        let removed = map.remove(&key);
        prop_assert_eq!(removed.get(&key), None);
    }

    /// Law: remove does not affect other keys.
    /// key1 != key2 => map.remove(&key1).get(&key2) == map.get(&key2)
    #[test]
    fn prop_get_remove_other_law(map in arbitrary_treemap(20), key1: i32, key2: i32) {
        prop_assume!(key1 != key2);
        let removed = map.remove(&key1);
        prop_assert_eq!(removed.get(&key2), map.get(&key2));
    }

    /// Law: removing an absent key leaves the content identical.
    #[test]
    fn prop_remove_absent_key_is_identity(map in arbitrary_treemap(20), key: i32) {
        prop_assume!(!map.contains_key(&key));
        let removed = map.remove(&key);
        prop_assert_eq!(&removed, &map);
    }
}

// =============================================================================
// Ordering Laws
// =============================================================================

proptest! {
    /// Law: iteration yields strictly ascending keys.
    #[test]
    fn prop_iteration_strictly_ascending(map in arbitrary_treemap(50)) {
        let keys: Vec<i32> = map.keys().copied().collect();
        prop_assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    }

    /// Law: insertion order does not affect content equality.
    #[test]
    fn prop_content_equality_is_order_independent(
        mut entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..30)
    ) {
        let forward: AvlTreeMap<i32, i32> = entries.clone().into_iter().collect();
        // Deduplicate by key keeping the last value, matching insert
        // semantics, then rebuild in reverse order.
        let mut deduplicated: BTreeMap<i32, i32> = BTreeMap::new();
        for (key, value) in entries.drain(..) {
            deduplicated.insert(key, value);
        }
        let reversed: AvlTreeMap<i32, i32> = deduplicated.into_iter().rev().collect();
        prop_assert_eq!(forward, reversed);
    }

    /// Law: ceiling returns the smallest key not smaller than the query.
    #[test]
    fn prop_ceiling_matches_model(map in arbitrary_treemap(30), query: i32) {
        let model: BTreeMap<i32, i32> = map.iter().map(|(k, v)| (*k, *v)).collect();
        let expected = model.range(query..).next().map(|(k, v)| (*k, *v));
        let actual = map.ceiling(&query).map(|(k, v)| (*k, *v));
        prop_assert_eq!(actual, expected);
    }
}

// =============================================================================
// Comparison Laws
// =============================================================================

proptest! {
    /// Law: comparison is reflexive.
    #[test]
    fn prop_compare_reflexive(map in arbitrary_treemap(20)) {
        prop_assert_eq!(map.cmp(&map.clone()), std::cmp::Ordering::Equal);
    }

    /// Law: comparison is antisymmetric.
    #[test]
    fn prop_compare_antisymmetric(
        first in arbitrary_treemap(20),
        second in arbitrary_treemap(20)
    ) {
        prop_assert_eq!(first.cmp(&second), second.cmp(&first).reverse());
    }

    /// Law: maps with identical in-order sequences compare equal.
    #[test]
    fn prop_identical_sequences_compare_equal(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..30)
    ) {
        let first: AvlTreeMap<i32, i32> = entries.clone().into_iter().collect();
        let second: AvlTreeMap<i32, i32> = entries.into_iter().collect();
        prop_assert_eq!(first.cmp(&second), std::cmp::Ordering::Equal);
    }
}

// =============================================================================
// Model Check Against BTreeMap
// =============================================================================

/// Operations applied to both the persistent map and the model.
#[derive(Debug, Clone)]
enum Operation {
    Insert(i32, i32),
    Remove(i32),
}

fn arbitrary_operations(max_length: usize) -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(
        prop_oneof![
            (0..100i32, any::<i32>()).prop_map(|(key, value)| Operation::Insert(key, value)),
            (0..100i32).prop_map(Operation::Remove),
        ],
        0..max_length,
    )
}

proptest! {
    /// Applying any operation sequence leaves the map with exactly the
    /// content of a `BTreeMap` driven by the same sequence.
    #[test]
    fn prop_matches_btreemap_model(operations in arbitrary_operations(100)) {
        let mut map = AvlTreeMap::new();
        let mut model = BTreeMap::new();

        for operation in operations {
            match operation {
                Operation::Insert(key, value) => {
                    map = map.insert(key, value);
                    model.insert(key, value);
                }
                Operation::Remove(key) => {
                    map = map.remove(&key);
                    model.remove(&key);
                }
            }

            prop_assert_eq!(map.len(), model.len());
        }

        let map_entries: Vec<(i32, i32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        let model_entries: Vec<(i32, i32)> = model.into_iter().collect();
        prop_assert_eq!(map_entries, model_entries);
    }
}
