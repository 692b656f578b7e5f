//! Persistent (immutable) ordered collections.
//!
//! This module provides ordered collections backed by a persistent AVL tree,
//! a self-balancing binary search tree whose operations return new versions
//! instead of mutating in place:
//!
//! - [`AvlTreeMap`]: persistent ordered map
//! - [`AvlTreeSet`]: persistent ordered set
//!
//! # Structural Sharing
//!
//! Both collections use structural sharing: an insert or remove rebuilds
//! only the nodes on the path from the root to the affected position and
//! reuses every other subtree by reference. A node may therefore be owned
//! by arbitrarily many versions at once; it is reclaimed when the last
//! version referencing it is dropped.
//!
//! Because no reachable node is ever mutated, any number of readers may
//! traverse any number of versions concurrently without coordination.
//! Enable the `arc` feature to make the node handles thread-safe.
//!
//! # Examples
//!
//! ## `AvlTreeMap`
//!
//! ```rust
//! use arbora::persistent::AvlTreeMap;
//!
//! let map = AvlTreeMap::new().insert(1, "one").insert(2, "two");
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.insert(1, "ONE");
//! assert_eq!(map.get(&1), Some(&"one"));     // Original unchanged
//! assert_eq!(updated.get(&1), Some(&"ONE")); // New version
//! ```
//!
//! ## `AvlTreeSet`
//!
//! ```rust
//! use arbora::persistent::AvlTreeSet;
//!
//! let set = AvlTreeSet::new().insert(3).insert(1).insert(2);
//! assert!(set.contains(&1));
//!
//! // Elements iterate in ascending order
//! let elements: Vec<&i32> = set.iter().collect();
//! assert_eq!(elements, vec![&1, &2, &3]);
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod treemap;
mod treeset;

pub use treemap::AvlTreeMap;
pub use treemap::AvlTreeMapIntoIterator;
pub use treemap::AvlTreeMapIterator;
pub use treemap::AvlTreeMapPostOrderIterator;
pub use treemap::AvlTreeMapPreOrderIterator;
pub use treeset::AvlTreeSet;
pub use treeset::AvlTreeSetIntoIterator;
pub use treeset::AvlTreeSetIterator;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod reference_counter_tests {
    use super::ReferenceCounter;
    use rstest::rstest;

    #[rstest]
    fn test_reference_counter_clone() {
        let reference_counter: ReferenceCounter<i32> = ReferenceCounter::new(42);
        let reference_counter_clone = reference_counter.clone();
        assert_eq!(*reference_counter, *reference_counter_clone);
    }

    #[rstest]
    fn test_reference_counter_strong_count() {
        let reference_counter: ReferenceCounter<i32> = ReferenceCounter::new(42);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
        let reference_counter_clone = reference_counter.clone();
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 2);
        drop(reference_counter_clone);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
    }
}
