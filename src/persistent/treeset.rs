//! Persistent (immutable) ordered set based on [`AvlTreeMap`].
//!
//! This module provides [`AvlTreeSet`], an immutable ordered set that uses
//! [`AvlTreeMap`] internally for efficient operations.
//!
//! # Overview
//!
//! `AvlTreeSet` is a wrapper around `AvlTreeMap<T, ()>` that provides
//! set-specific operations. The value slot carries the zero-size unit
//! type, so a set node costs no more than its element.
//!
//! - O(log N) insert
//! - O(log N) remove
//! - O(log N) contains
//! - O(1) len and `is_empty`
//!
//! All operations return new sets without modifying the original, and
//! structural sharing ensures memory efficiency.
//!
//! # Examples
//!
//! ```rust
//! use arbora::persistent::AvlTreeSet;
//!
//! let set = AvlTreeSet::new().insert(3).insert(1).insert(2);
//!
//! assert!(set.contains(&1));
//! assert_eq!(set.len(), 3);
//!
//! // Elements iterate in ascending order
//! let elements: Vec<&i32> = set.iter().collect();
//! assert_eq!(elements, vec![&1, &2, &3]);
//! ```

use super::AvlTreeMap;
use super::treemap::{AvlTreeMapIntoIterator, AvlTreeMapIterator};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

// =============================================================================
// AvlTreeSet Definition
// =============================================================================

/// A persistent (immutable) ordered set based on [`AvlTreeMap`].
///
/// `AvlTreeSet` stores unique elements in sorted order. Every "mutating"
/// operation returns a new set that shares all untouched subtrees with
/// the original.
///
/// # Time Complexity
///
/// | Operation  | Complexity |
/// |------------|------------|
/// | `new`      | O(1)       |
/// | `insert`   | O(log N)   |
/// | `remove`   | O(log N)   |
/// | `contains` | O(log N)   |
/// | `ceiling`  | O(log N)   |
/// | `min`/`max`| O(log N)   |
/// | `len`      | O(1)       |
///
/// # Examples
///
/// ```rust
/// use arbora::persistent::AvlTreeSet;
///
/// let set = AvlTreeSet::new().insert(1).insert(2);
/// let without_one = set.remove(&1);
///
/// assert!(set.contains(&1));          // Original unchanged
/// assert!(!without_one.contains(&1)); // New version
/// ```
#[derive(Clone)]
pub struct AvlTreeSet<T> {
    inner: AvlTreeMap<T, ()>,
}

impl<T> AvlTreeSet<T> {
    /// Creates a new empty set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbora::persistent::AvlTreeSet;
    ///
    /// let set: AvlTreeSet<i32> = AvlTreeSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: AvlTreeMap::new(),
        }
    }

    /// Returns the number of elements in the set.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `true` if both sets share the same root node.
    ///
    /// Sets with the same root are necessarily equal; the comparison
    /// implementations use this as a short-circuit.
    #[must_use]
    pub fn same_root(&self, other: &Self) -> bool {
        self.inner.same_root(&other.inner)
    }
}

impl<T: Clone + Ord> AvlTreeSet<T> {
    /// Creates a set containing a single element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbora::persistent::AvlTreeSet;
    ///
    /// let set = AvlTreeSet::singleton(42);
    /// assert!(set.contains(&42));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::new().insert(element)
    }

    /// Adds an element to the set.
    ///
    /// Inserting an element that is already present yields a set with the
    /// same content.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbora::persistent::AvlTreeSet;
    ///
    /// let set = AvlTreeSet::new().insert(1);
    /// let larger = set.insert(2);
    ///
    /// assert_eq!(set.len(), 1);    // Original unchanged
    /// assert_eq!(larger.len(), 2); // New version
    /// ```
    #[must_use]
    pub fn insert(&self, element: T) -> Self {
        Self {
            inner: self.inner.insert(element, ()),
        }
    }

    /// Removes an element from the set.
    ///
    /// If the element doesn't exist, returns a clone of the original set.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn remove<Q>(&self, element: &Q) -> Self
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Self {
            inner: self.inner.remove(element),
        }
    }

    /// Returns `true` if the set contains the given element.
    ///
    /// The element may be any borrowed form of the set's element type, but
    /// the ordering on the borrowed form must match the ordering on the
    /// element type.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbora::persistent::AvlTreeSet;
    ///
    /// let set = AvlTreeSet::new().insert("key".to_string());
    ///
    /// assert!(set.contains("key"));
    /// assert!(!set.contains("other"));
    /// ```
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.contains_key(element)
    }

    /// Returns the smallest element that is not smaller than the query.
    ///
    /// Returns `None` if every element compares less than the query.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbora::persistent::AvlTreeSet;
    ///
    /// let set: AvlTreeSet<i32> = [10, 20, 30].into_iter().collect();
    ///
    /// assert_eq!(set.ceiling(&15), Some(&20));
    /// assert_eq!(set.ceiling(&31), None);
    /// ```
    #[must_use]
    pub fn ceiling<Q>(&self, element: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.ceiling(element).map(|(key, ())| key)
    }

    /// Returns the minimum element.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn min(&self) -> Option<&T> {
        AvlTreeMap::min(&self.inner).map(|(key, ())| key)
    }

    /// Returns the maximum element.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn max(&self) -> Option<&T> {
        AvlTreeMap::max(&self.inner).map(|(key, ())| key)
    }

    /// Applies a visitor to every element in ascending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbora::persistent::AvlTreeSet;
    ///
    /// let set: AvlTreeSet<i32> = [3, 1, 2].into_iter().collect();
    ///
    /// let mut elements = Vec::new();
    /// set.for_each(|element| elements.push(*element));
    /// assert_eq!(elements, vec![1, 2, 3]);
    /// ```
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&T),
    {
        self.inner.for_each(|element, ()| visitor(element));
    }

    /// Returns an iterator over elements in ascending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbora::persistent::AvlTreeSet;
    ///
    /// let set: AvlTreeSet<i32> = [3, 1, 2].into_iter().collect();
    /// let elements: Vec<&i32> = set.iter().collect();
    /// assert_eq!(elements, vec![&1, &2, &3]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> AvlTreeSetIterator<'_, T> {
        AvlTreeSetIterator {
            inner: self.inner.iter(),
        }
    }

    /// Returns a `Vec` of the elements in pre-order (node before its
    /// subtrees). A debugging and dump aid.
    #[must_use]
    pub fn elements_pre_order(&self) -> Vec<&T> {
        self.inner.iter_pre_order().map(|(key, ())| key).collect()
    }

    /// Returns a `Vec` of the elements in post-order (subtrees before
    /// their node). A debugging and dump aid.
    #[must_use]
    pub fn elements_post_order(&self) -> Vec<&T> {
        self.inner.iter_post_order().map(|(key, ())| key).collect()
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An in-order iterator over the elements of an [`AvlTreeSet`].
pub struct AvlTreeSetIterator<'a, T> {
    inner: AvlTreeMapIterator<'a, T, ()>,
}

impl<'a, T> Iterator for AvlTreeSetIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(element, ())| element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for AvlTreeSetIterator<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// An owning iterator over the elements of an [`AvlTreeSet`].
pub struct AvlTreeSetIntoIterator<T> {
    inner: AvlTreeMapIntoIterator<T, ()>,
}

impl<T> Iterator for AvlTreeSetIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(element, ())| element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for AvlTreeSetIntoIterator<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for AvlTreeSet<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Ord> FromIterator<T> for AvlTreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for element in iter {
            set = set.insert(element);
        }
        set
    }
}

impl<T: Clone + Ord> IntoIterator for AvlTreeSet<T> {
    type Item = T;
    type IntoIter = AvlTreeSetIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        AvlTreeSetIntoIterator {
            inner: self.inner.into_iter(),
        }
    }
}

impl<'a, T: Clone + Ord> IntoIterator for &'a AvlTreeSet<T> {
    type Item = &'a T;
    type IntoIter = AvlTreeSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Equality is by in-order content, independent of insertion order and
/// internal tree shape.
impl<T: Clone + Ord> PartialEq for AvlTreeSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T: Clone + Ord> Eq for AvlTreeSet<T> {}

/// Sets order lexicographically by their ascending element sequences; a
/// set whose sequence is a strict prefix of another's sorts first.
impl<T: Clone + Ord> PartialOrd for AvlTreeSet<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Clone + Ord> Ord for AvlTreeSet<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl<T: Clone + Ord + Hash> Hash for AvlTreeSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl<T: Clone + Ord + fmt::Debug> fmt::Debug for AvlTreeSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Clone + Ord + fmt::Display> fmt::Display for AvlTreeSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize + Clone + Ord> serde::Serialize for AvlTreeSet<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut sequence = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            sequence.serialize_element(element)?;
        }
        sequence.end()
    }
}

#[cfg(feature = "serde")]
struct AvlTreeSetVisitor<T> {
    element_marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<T> AvlTreeSetVisitor<T> {
    const fn new() -> Self {
        Self {
            element_marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for AvlTreeSetVisitor<T>
where
    T: serde::Deserialize<'de> + Clone + Ord,
{
    type Value = AvlTreeSet<T>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut set = AvlTreeSet::new();
        while let Some(element) = access.next_element()? {
            set = set.insert(element);
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for AvlTreeSet<T>
where
    T: serde::Deserialize<'de> + Clone + Ord,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(AvlTreeSetVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_new_creates_empty_set() {
        let set: AvlTreeSet<i32> = AvlTreeSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[rstest]
    fn test_insert_is_idempotent_on_content() {
        let set = AvlTreeSet::new().insert(1).insert(1).insert(1);
        assert_eq!(set.len(), 1);
        assert!(set.contains(&1));
    }

    #[rstest]
    fn test_insert_preserves_original() {
        let set = AvlTreeSet::new().insert(1);
        let larger = set.insert(2);

        assert_eq!(set.len(), 1);
        assert_eq!(larger.len(), 2);
        assert!(!set.contains(&2));
        assert!(larger.contains(&2));
    }

    #[rstest]
    fn test_remove() {
        let set: AvlTreeSet<i32> = [1, 2, 3].into_iter().collect();
        let removed = set.remove(&2);

        assert_eq!(removed.len(), 2);
        assert!(!removed.contains(&2));
        assert!(set.contains(&2));
    }

    #[rstest]
    fn test_remove_absent_element_keeps_content() {
        let set: AvlTreeSet<i32> = [1, 2].into_iter().collect();
        let unchanged = set.remove(&99);
        assert!(set.same_root(&unchanged));
        assert_eq!(set, unchanged);
    }

    #[rstest]
    fn test_contains_by_borrowed_form() {
        let set = AvlTreeSet::new().insert("hello".to_string());
        assert!(set.contains("hello"));
        assert!(!set.contains("world"));
    }

    #[rstest]
    fn test_iter_sorted() {
        let set: AvlTreeSet<i32> = [5, 3, 1, 4, 2].into_iter().collect();
        let elements: Vec<i32> = set.iter().copied().collect();
        assert_eq!(elements, vec![1, 2, 3, 4, 5]);
    }

    #[rstest]
    fn test_ceiling_and_min_max() {
        let set: AvlTreeSet<i32> = [10, 20, 30].into_iter().collect();

        assert_eq!(set.ceiling(&15), Some(&20));
        assert_eq!(set.ceiling(&30), Some(&30));
        assert_eq!(set.ceiling(&31), None);
        assert_eq!(AvlTreeSet::min(&set), Some(&10));
        assert_eq!(AvlTreeSet::max(&set), Some(&30));
    }

    #[rstest]
    fn test_equality_independent_of_insertion_order() {
        let ascending: AvlTreeSet<i32> = (1..=60).collect();
        let descending: AvlTreeSet<i32> = (1..=60).rev().collect();

        assert_eq!(ascending, descending);
        assert!(!ascending.same_root(&descending));
    }

    #[rstest]
    fn test_ordering_between_sets() {
        let smaller: AvlTreeSet<i32> = [1, 2].into_iter().collect();
        let larger: AvlTreeSet<i32> = [1, 3].into_iter().collect();
        let prefix: AvlTreeSet<i32> = [1].into_iter().collect();

        assert!(smaller < larger);
        assert!(prefix < smaller);
        assert_eq!(smaller.cmp(&smaller.clone()), Ordering::Equal);
    }

    #[rstest]
    fn test_pre_order_and_post_order_dumps() {
        let set: AvlTreeSet<i32> = [2, 1, 3].into_iter().collect();
        assert_eq!(set.elements_pre_order(), vec![&2, &1, &3]);
        assert_eq!(set.elements_post_order(), vec![&1, &3, &2]);
    }

    #[rstest]
    fn test_display_sorted() {
        let set: AvlTreeSet<i32> = [3, 1, 2].into_iter().collect();
        assert_eq!(format!("{set}"), "{1, 2, 3}");
    }

    #[rstest]
    fn test_into_iter_owned() {
        let set: AvlTreeSet<i32> = [3, 1, 2].into_iter().collect();
        let elements: Vec<i32> = set.into_iter().collect();
        assert_eq!(elements, vec![1, 2, 3]);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn test_serde_round_trip() {
        let set: AvlTreeSet<i32> = [3, 1, 2].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[1,2,3]");
        let restored: AvlTreeSet<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(set, restored);
    }
}
