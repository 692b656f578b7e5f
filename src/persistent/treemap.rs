//! Persistent (immutable) ordered map based on an AVL tree.
//!
//! This module provides [`AvlTreeMap`], an immutable ordered map that uses
//! structural sharing for efficient operations.
//!
//! # Overview
//!
//! `AvlTreeMap` is based on a persistent AVL tree, a self-balancing binary
//! search tree that keeps the heights of every node's two subtrees within
//! one of each other.
//!
//! - O(log N) get
//! - O(log N) insert
//! - O(log N) remove
//! - O(log N) min/max/ceiling
//! - O(1) len and `is_empty`
//!
//! All operations return new maps without modifying the original, and
//! structural sharing ensures memory efficiency: only the path from the
//! root to the affected node is rebuilt.
//!
//! # Examples
//!
//! ```rust
//! use arbora::persistent::AvlTreeMap;
//!
//! let map = AvlTreeMap::new()
//!     .insert(3, "three")
//!     .insert(1, "one")
//!     .insert(2, "two");
//!
//! // Entries are always in sorted order
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//!
//! // Smallest key not smaller than the query
//! assert_eq!(map.ceiling(&2), Some((&2, &"two")));
//! ```
//!
//! # Internal Structure
//!
//! Every node caches its height, and the tree maintains the following
//! invariants:
//! 1. `height(node) == 1 + max(height(left), height(right))`, with
//!    `height(nil) == 0`
//! 2. `|height(left) - height(right)| <= 1` at every node
//! 3. Keys in the left subtree compare less than the node's key; keys in
//!    the right subtree compare greater
//!
//! Invariant 2 bounds the height by roughly `1.44 * log2(N + 2)`, which
//! keeps every search path logarithmic.

use super::ReferenceCounter;
use arrayvec::ArrayVec;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

// =============================================================================
// Node Definition
// =============================================================================

/// Maximum supported tree height for the explicit traversal stack.
///
/// An AVL tree of height `h` holds at least `F(h + 2) - 1` nodes, so a
/// height beyond 96 is unreachable for any node count addressable in a
/// 64-bit space. Exceeding this bound is an invariant failure, not a
/// recoverable error.
const MAX_HEIGHT: usize = 96;

/// Handle to an immutable, shareable tree node.
type NodeHandle<K, V> = ReferenceCounter<Node<K, V>>;

/// Internal node structure for the AVL tree.
///
/// Nodes are never modified after construction; every change produces a
/// freshly constructed node, and unchanged subtrees are shared by handle.
struct Node<K, V> {
    key: K,
    value: V,
    left: Option<NodeHandle<K, V>>,
    right: Option<NodeHandle<K, V>>,
    height: i64,
}

impl<K, V> Node<K, V> {
    /// Constructs a node, computing its cached height from the children.
    fn make(
        key: K,
        value: V,
        left: Option<NodeHandle<K, V>>,
        right: Option<NodeHandle<K, V>>,
    ) -> NodeHandle<K, V> {
        let node_height = 1 + height(left.as_ref()).max(height(right.as_ref()));
        ReferenceCounter::new(Self {
            key,
            value,
            left,
            right,
            height: node_height,
        })
    }
}

/// Cached height of an optional subtree; `0` for the empty subtree.
fn height<K, V>(node: Option<&NodeHandle<K, V>>) -> i64 {
    node.map_or(0, |node_ref| node_ref.height)
}

// =============================================================================
// AvlTreeMap Definition
// =============================================================================

/// A persistent (immutable) ordered map based on an AVL tree.
///
/// `AvlTreeMap` is an immutable data structure that uses structural
/// sharing to efficiently support functional programming patterns.
///
/// Keys must implement `Ord`. The map maintains entries in sorted key
/// order, enabling ordered iteration and "closest not smaller" queries.
///
/// # Time Complexity
///
/// | Operation      | Complexity |
/// |----------------|------------|
/// | `new`          | O(1)       |
/// | `get`          | O(log N)   |
/// | `insert`       | O(log N)   |
/// | `remove`       | O(log N)   |
/// | `contains_key` | O(log N)   |
/// | `ceiling`      | O(log N)   |
/// | `min`/`max`    | O(log N)   |
/// | `len`          | O(1)       |
/// | `is_empty`     | O(1)       |
///
/// # Examples
///
/// ```rust
/// use arbora::persistent::AvlTreeMap;
///
/// let map = AvlTreeMap::singleton(42, "answer");
/// assert_eq!(map.get(&42), Some(&"answer"));
///
/// // Ordered iteration
/// let map = AvlTreeMap::new()
///     .insert(3, "three")
///     .insert(1, "one")
///     .insert(2, "two");
///
/// let keys: Vec<&i32> = map.keys().collect();
/// assert_eq!(keys, vec![&1, &2, &3]);
/// ```
#[derive(Clone)]
pub struct AvlTreeMap<K, V> {
    /// Root node of the tree
    root: Option<NodeHandle<K, V>>,
    /// Number of entries
    length: usize,
}

impl<K, V> AvlTreeMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbora::persistent::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<i32, String> = AvlTreeMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: None,
            length: 0,
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns `true` if both maps share the same root node.
    ///
    /// Two maps with the same root are necessarily equal; the comparison
    /// implementations use this as a short-circuit. The converse does not
    /// hold: equal maps built independently have distinct roots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbora::persistent::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::new().insert(1, "one");
    /// let copy = map.clone();
    /// assert!(map.same_root(&copy));
    ///
    /// let rebuilt = AvlTreeMap::new().insert(1, "one");
    /// assert!(!map.same_root(&rebuilt));
    /// ```
    #[must_use]
    pub fn same_root(&self, other: &Self) -> bool {
        match (self.root.as_ref(), other.root.as_ref()) {
            (None, None) => true,
            (Some(own_root), Some(other_root)) => {
                ReferenceCounter::ptr_eq(own_root, other_root)
            }
            _ => false,
        }
    }
}

impl<K: Clone + Ord, V: Clone> AvlTreeMap<K, V> {
    /// Creates a map containing a single key-value pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbora::persistent::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::singleton(42, "answer");
    /// assert_eq!(map.len(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::new().insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form must match the ordering on the key
    /// type. This enables lookups by a key-comparable surrogate without
    /// constructing a full key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbora::persistent::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::new().insert("hello".to_string(), 42);
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Self::get_from_node(self.root.as_ref(), key)
    }

    /// Recursive helper for get.
    fn get_from_node<'a, Q>(node: Option<&'a NodeHandle<K, V>>, key: &Q) -> Option<&'a V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        node.and_then(|node_ref| match key.cmp(node_ref.key.borrow()) {
            Ordering::Less => Self::get_from_node(node_ref.left.as_ref(), key),
            Ordering::Greater => Self::get_from_node(node_ref.right.as_ref(), key),
            Ordering::Equal => Some(&node_ref.value),
        })
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns the entry with the smallest key that is not smaller than
    /// the query key.
    ///
    /// Returns `None` if every key in the map compares less than the
    /// query.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbora::persistent::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::new()
    ///     .insert(10, "ten")
    ///     .insert(20, "twenty")
    ///     .insert(30, "thirty");
    ///
    /// assert_eq!(map.ceiling(&15), Some((&20, &"twenty")));
    /// assert_eq!(map.ceiling(&20), Some((&20, &"twenty")));
    /// assert_eq!(map.ceiling(&31), None);
    /// ```
    #[must_use]
    pub fn ceiling<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Self::ceiling_from_node(self.root.as_ref(), key)
    }

    /// Recursive helper for ceiling. While descending, the current node is
    /// the best candidate so far whenever the query compares less than it.
    fn ceiling_from_node<'a, Q>(
        node: Option<&'a NodeHandle<K, V>>,
        key: &Q,
    ) -> Option<(&'a K, &'a V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        node.and_then(|node_ref| match key.cmp(node_ref.key.borrow()) {
            Ordering::Less => Self::ceiling_from_node(node_ref.left.as_ref(), key)
                .or(Some((&node_ref.key, &node_ref.value))),
            Ordering::Greater => Self::ceiling_from_node(node_ref.right.as_ref(), key),
            Ordering::Equal => Some((&node_ref.key, &node_ref.value)),
        })
    }

    /// Returns the entry with the minimum key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        Self::min_from_node(self.root.as_ref())
    }

    /// Recursive helper for min.
    fn min_from_node(node: Option<&NodeHandle<K, V>>) -> Option<(&K, &V)> {
        node.and_then(|node_ref| {
            node_ref.left.as_ref().map_or_else(
                || Some((&node_ref.key, &node_ref.value)),
                |left| Self::min_from_node(Some(left)),
            )
        })
    }

    /// Returns the entry with the maximum key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        Self::max_from_node(self.root.as_ref())
    }

    /// Recursive helper for max.
    fn max_from_node(node: Option<&NodeHandle<K, V>>) -> Option<(&K, &V)> {
        node.and_then(|node_ref| {
            node_ref.right.as_ref().map_or_else(
                || Some((&node_ref.key, &node_ref.value)),
                |right| Self::max_from_node(Some(right)),
            )
        })
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contains the key, the value is replaced.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbora::persistent::AvlTreeMap;
    ///
    /// let map1 = AvlTreeMap::new().insert(1, "one");
    /// let map2 = map1.insert(1, "ONE");
    ///
    /// assert_eq!(map1.get(&1), Some(&"one")); // Original unchanged
    /// assert_eq!(map2.get(&1), Some(&"ONE")); // New version
    /// ```
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let (new_root, added) = Self::insert_into_node(self.root.as_ref(), key, value);
        Self {
            root: Some(new_root),
            length: if added { self.length + 1 } else { self.length },
        }
    }

    /// Recursive helper for insert.
    /// Returns (`new_node`, `was_added`) where `was_added` is true if a
    /// new entry was added rather than an existing value replaced.
    fn insert_into_node(
        node: Option<&NodeHandle<K, V>>,
        key: K,
        value: V,
    ) -> (NodeHandle<K, V>, bool) {
        match node {
            None => (Node::make(key, value, None, None), true),
            Some(node_ref) => match key.cmp(&node_ref.key) {
                Ordering::Less => {
                    let (new_left, added) =
                        Self::insert_into_node(node_ref.left.as_ref(), key, value);
                    (
                        Self::rebalance(
                            node_ref.key.clone(),
                            node_ref.value.clone(),
                            Some(new_left),
                            node_ref.right.clone(),
                        ),
                        added,
                    )
                }
                Ordering::Greater => {
                    let (new_right, added) =
                        Self::insert_into_node(node_ref.right.as_ref(), key, value);
                    (
                        Self::rebalance(
                            node_ref.key.clone(),
                            node_ref.value.clone(),
                            node_ref.left.clone(),
                            Some(new_right),
                        ),
                        added,
                    )
                }
                Ordering::Equal => {
                    // Key exists: replace the value in place. Height is
                    // unchanged, so no rebalance is needed.
                    (
                        Node::make(key, value, node_ref.left.clone(), node_ref.right.clone()),
                        false,
                    )
                }
            },
        }
    }

    /// Removes a key from the map.
    ///
    /// Returns a new map without the key. If the key doesn't exist,
    /// returns a clone of the original map.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbora::persistent::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::new().insert(1, "one").insert(2, "two");
    /// let removed = map.remove(&1);
    ///
    /// assert_eq!(map.len(), 2);     // Original unchanged
    /// assert_eq!(removed.len(), 1); // New version
    /// assert_eq!(removed.get(&1), None);
    /// ```
    #[must_use]
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if !self.contains_key(key) {
            return self.clone();
        }

        let new_root = self
            .root
            .as_ref()
            .and_then(|root| Self::remove_from_node(root, key));

        Self {
            root: new_root,
            length: self.length.saturating_sub(1),
        }
    }

    /// Recursive helper for remove. Every ancestor on the search path is
    /// rebuilt through [`Self::rebalance`].
    fn remove_from_node<Q>(node: &NodeHandle<K, V>, key: &Q) -> Option<NodeHandle<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match key.cmp(node.key.borrow()) {
            Ordering::Less => {
                let new_left = node
                    .left
                    .as_ref()
                    .and_then(|left| Self::remove_from_node(left, key));
                Some(Self::rebalance(
                    node.key.clone(),
                    node.value.clone(),
                    new_left,
                    node.right.clone(),
                ))
            }
            Ordering::Greater => {
                let new_right = node
                    .right
                    .as_ref()
                    .and_then(|right| Self::remove_from_node(right, key));
                Some(Self::rebalance(
                    node.key.clone(),
                    node.value.clone(),
                    node.left.clone(),
                    new_right,
                ))
            }
            Ordering::Equal => match (&node.left, &node.right) {
                (None, None) => None,
                (Some(left), None) => Some(left.clone()),
                (None, Some(right)) => Some(right.clone()),
                (Some(left), Some(right)) => {
                    // Splice in a replacement from the taller subtree so
                    // that removal never systematically unbalances one
                    // side: the in-order successor when the right subtree
                    // is taller, the in-order predecessor otherwise.
                    if left.height < right.height {
                        let (new_right, successor_key, successor_value) = Self::take_min(right);
                        Some(Self::rebalance(
                            successor_key,
                            successor_value,
                            node.left.clone(),
                            new_right,
                        ))
                    } else {
                        let (new_left, predecessor_key, predecessor_value) = Self::take_max(left);
                        Some(Self::rebalance(
                            predecessor_key,
                            predecessor_value,
                            new_left,
                            node.right.clone(),
                        ))
                    }
                }
            },
        }
    }

    /// Removes the leftmost entry of a subtree, returning the remaining
    /// subtree and the extracted key-value pair.
    fn take_min(node: &NodeHandle<K, V>) -> (Option<NodeHandle<K, V>>, K, V) {
        match node.left.as_ref() {
            None => (node.right.clone(), node.key.clone(), node.value.clone()),
            Some(left) => {
                let (new_left, min_key, min_value) = Self::take_min(left);
                (
                    Some(Self::rebalance(
                        node.key.clone(),
                        node.value.clone(),
                        new_left,
                        node.right.clone(),
                    )),
                    min_key,
                    min_value,
                )
            }
        }
    }

    /// Removes the rightmost entry of a subtree, returning the remaining
    /// subtree and the extracted key-value pair.
    fn take_max(node: &NodeHandle<K, V>) -> (Option<NodeHandle<K, V>>, K, V) {
        match node.right.as_ref() {
            None => (node.left.clone(), node.key.clone(), node.value.clone()),
            Some(right) => {
                let (new_right, max_key, max_value) = Self::take_max(right);
                (
                    Some(Self::rebalance(
                        node.key.clone(),
                        node.value.clone(),
                        node.left.clone(),
                        new_right,
                    )),
                    max_key,
                    max_value,
                )
            }
        }
    }

    // =========================================================================
    // Balancing Engine
    // =========================================================================

    /// Rebuilds a node from a key-value pair and two candidate subtrees,
    /// restoring the height-balance invariant with at most one single or
    /// double rotation.
    ///
    /// Assumes both subtrees individually satisfy the invariant and that
    /// their heights differ by at most 2, which insert and remove
    /// guarantee since each recursive step changes a height by at most 1.
    fn rebalance(
        key: K,
        value: V,
        left: Option<NodeHandle<K, V>>,
        right: Option<NodeHandle<K, V>>,
    ) -> NodeHandle<K, V> {
        match height(left.as_ref()) - height(right.as_ref()) {
            2 => match left {
                Some(left_node)
                    if height(left_node.left.as_ref()) - height(left_node.right.as_ref())
                        == -1 =>
                {
                    Self::rotate_left_right(key, value, &left_node, right)
                }
                Some(left_node) => Self::rotate_right(key, value, &left_node, right),
                None => Node::make(key, value, None, right),
            },
            -2 => match right {
                Some(right_node)
                    if height(right_node.left.as_ref()) - height(right_node.right.as_ref())
                        == 1 =>
                {
                    Self::rotate_right_left(key, value, left, &right_node)
                }
                Some(right_node) => Self::rotate_left(key, value, left, &right_node),
                None => Node::make(key, value, left, None),
            },
            _ => Node::make(key, value, left, right),
        }
    }

    /// Single right rotation for the left-heavy case: the left child
    /// becomes the new subtree root, and the original key-value pair moves
    /// into a fresh right child. Subtrees not on the rotation path are
    /// reused by handle.
    fn rotate_right(
        key: K,
        value: V,
        left: &NodeHandle<K, V>,
        right: Option<NodeHandle<K, V>>,
    ) -> NodeHandle<K, V> {
        Node::make(
            left.key.clone(),
            left.value.clone(),
            left.left.clone(),
            Some(Node::make(key, value, left.right.clone(), right)),
        )
    }

    /// Single left rotation, the mirror image of [`Self::rotate_right`].
    fn rotate_left(
        key: K,
        value: V,
        left: Option<NodeHandle<K, V>>,
        right: &NodeHandle<K, V>,
    ) -> NodeHandle<K, V> {
        Node::make(
            right.key.clone(),
            right.value.clone(),
            Some(Node::make(key, value, left, right.left.clone())),
            right.right.clone(),
        )
    }

    /// Left-right double rotation for a left child that is itself
    /// right-heavy: the left child's right grandchild becomes the new
    /// subtree root.
    fn rotate_left_right(
        key: K,
        value: V,
        left: &NodeHandle<K, V>,
        right: Option<NodeHandle<K, V>>,
    ) -> NodeHandle<K, V> {
        match left.right.as_ref() {
            Some(pivot) => Node::make(
                pivot.key.clone(),
                pivot.value.clone(),
                Some(Node::make(
                    left.key.clone(),
                    left.value.clone(),
                    left.left.clone(),
                    pivot.left.clone(),
                )),
                Some(Node::make(key, value, pivot.right.clone(), right)),
            ),
            None => Self::rotate_right(key, value, left, right),
        }
    }

    /// Right-left double rotation, the mirror image of
    /// [`Self::rotate_left_right`].
    fn rotate_right_left(
        key: K,
        value: V,
        left: Option<NodeHandle<K, V>>,
        right: &NodeHandle<K, V>,
    ) -> NodeHandle<K, V> {
        match right.left.as_ref() {
            Some(pivot) => Node::make(
                pivot.key.clone(),
                pivot.value.clone(),
                Some(Node::make(key, value, left, pivot.left.clone())),
                Some(Node::make(
                    right.key.clone(),
                    right.value.clone(),
                    pivot.right.clone(),
                    right.right.clone(),
                )),
            ),
            None => Self::rotate_left(key, value, left, right),
        }
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Applies a visitor to every entry in ascending key order.
    ///
    /// A single in-order pass; the traversal is not restartable midway but
    /// may be invoked repeatedly from scratch.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbora::persistent::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::new().insert(2, 20).insert(1, 10);
    ///
    /// let mut sum = 0;
    /// map.for_each(|_, value| sum += value);
    /// assert_eq!(sum, 30);
    /// ```
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &V),
    {
        Self::for_each_node(self.root.as_ref(), &mut visitor);
    }

    /// Recursive in-order visitation.
    fn for_each_node<F>(node: Option<&NodeHandle<K, V>>, visitor: &mut F)
    where
        F: FnMut(&K, &V),
    {
        if let Some(node_ref) = node {
            Self::for_each_node(node_ref.left.as_ref(), visitor);
            visitor(&node_ref.key, &node_ref.value);
            Self::for_each_node(node_ref.right.as_ref(), visitor);
        }
    }

    /// Returns an iterator over entries in sorted key order.
    ///
    /// The iterator walks the tree with an explicit stack bounded by the
    /// maximum supported height, so it allocates nothing per step.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbora::persistent::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::new()
    ///     .insert(3, "three")
    ///     .insert(1, "one")
    ///     .insert(2, "two");
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    /// ```
    #[must_use]
    pub fn iter(&self) -> AvlTreeMapIterator<'_, K, V> {
        AvlTreeMapIterator {
            cursor: InOrderCursor::new(self.root.as_ref()),
            remaining: self.length,
        }
    }

    /// Returns an iterator over keys in sorted order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbora::persistent::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::new().insert(3, "c").insert(1, "a").insert(2, "b");
    /// let keys: Vec<&i32> = map.keys().collect();
    /// assert_eq!(keys, vec![&1, &2, &3]);
    /// ```
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arbora::persistent::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::new().insert(1, 10).insert(2, 20).insert(3, 30);
    /// let sum: i32 = map.values().sum();
    /// assert_eq!(sum, 60);
    /// ```
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Returns an iterator over entries in pre-order (node before its
    /// subtrees).
    ///
    /// A debugging and dump aid; only the in-order traversal carries an
    /// ordering guarantee on keys.
    #[must_use]
    pub fn iter_pre_order(&self) -> AvlTreeMapPreOrderIterator<'_, K, V> {
        let mut entries = Vec::with_capacity(self.length);
        Self::collect_pre_order(self.root.as_ref(), &mut entries);
        AvlTreeMapPreOrderIterator {
            entries,
            current_index: 0,
        }
    }

    /// Collects entries in pre-order.
    fn collect_pre_order<'a>(
        node: Option<&'a NodeHandle<K, V>>,
        entries: &mut Vec<(&'a K, &'a V)>,
    ) {
        if let Some(node_ref) = node {
            entries.push((&node_ref.key, &node_ref.value));
            Self::collect_pre_order(node_ref.left.as_ref(), entries);
            Self::collect_pre_order(node_ref.right.as_ref(), entries);
        }
    }

    /// Returns an iterator over entries in post-order (subtrees before
    /// their node).
    #[must_use]
    pub fn iter_post_order(&self) -> AvlTreeMapPostOrderIterator<'_, K, V> {
        let mut entries = Vec::with_capacity(self.length);
        Self::collect_post_order(self.root.as_ref(), &mut entries);
        AvlTreeMapPostOrderIterator {
            entries,
            current_index: 0,
        }
    }

    /// Collects entries in post-order.
    fn collect_post_order<'a>(
        node: Option<&'a NodeHandle<K, V>>,
        entries: &mut Vec<(&'a K, &'a V)>,
    ) {
        if let Some(node_ref) = node {
            Self::collect_post_order(node_ref.left.as_ref(), entries);
            Self::collect_post_order(node_ref.right.as_ref(), entries);
            entries.push((&node_ref.key, &node_ref.value));
        }
    }
}

// =============================================================================
// In-Order Cursor
// =============================================================================

/// Explicit-stack, non-recursive in-order cursor.
///
/// The stack capacity covers the maximum height reachable by any tree this
/// crate can represent; overflowing it means the balance invariant was
/// broken, and the push panics.
struct InOrderCursor<'a, K, V> {
    stack: ArrayVec<&'a Node<K, V>, MAX_HEIGHT>,
}

impl<'a, K, V> InOrderCursor<'a, K, V> {
    fn new(root: Option<&'a NodeHandle<K, V>>) -> Self {
        let mut cursor = Self {
            stack: ArrayVec::new(),
        };
        cursor.push_left_spine(root);
        cursor
    }

    /// Descends to the leftmost node of the given subtree, recording the
    /// path.
    fn push_left_spine(&mut self, mut node: Option<&'a NodeHandle<K, V>>) {
        while let Some(node_ref) = node {
            self.stack.push(node_ref.as_ref());
            node = node_ref.left.as_ref();
        }
    }

    /// The node at the current in-order position, or `None` when the
    /// traversal is exhausted.
    fn current(&self) -> Option<&'a Node<K, V>> {
        self.stack.last().copied()
    }

    /// Advances to the next in-order position.
    fn move_next(&mut self) {
        if let Some(node_ref) = self.stack.pop() {
            self.push_left_spine(node_ref.right.as_ref());
        }
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An in-order iterator over key-value pairs of an [`AvlTreeMap`].
pub struct AvlTreeMapIterator<'a, K, V> {
    cursor: InOrderCursor<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iterator for AvlTreeMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cursor.current()?;
        self.cursor.move_next();
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for AvlTreeMapIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

/// A pre-order iterator over key-value pairs of an [`AvlTreeMap`].
pub struct AvlTreeMapPreOrderIterator<'a, K, V> {
    entries: Vec<(&'a K, &'a V)>,
    current_index: usize,
}

impl<'a, K, V> Iterator for AvlTreeMapPreOrderIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.entries.len() {
            None
        } else {
            let entry = self.entries[self.current_index];
            self.current_index += 1;
            Some(entry)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len().saturating_sub(self.current_index);
        (remaining, Some(remaining))
    }
}

impl<K, V> ExactSizeIterator for AvlTreeMapPreOrderIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.entries.len().saturating_sub(self.current_index)
    }
}

/// A post-order iterator over key-value pairs of an [`AvlTreeMap`].
pub struct AvlTreeMapPostOrderIterator<'a, K, V> {
    entries: Vec<(&'a K, &'a V)>,
    current_index: usize,
}

impl<'a, K, V> Iterator for AvlTreeMapPostOrderIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.entries.len() {
            None
        } else {
            let entry = self.entries[self.current_index];
            self.current_index += 1;
            Some(entry)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len().saturating_sub(self.current_index);
        (remaining, Some(remaining))
    }
}

impl<K, V> ExactSizeIterator for AvlTreeMapPostOrderIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.entries.len().saturating_sub(self.current_index)
    }
}

/// An owning iterator over key-value pairs of an [`AvlTreeMap`].
pub struct AvlTreeMapIntoIterator<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for AvlTreeMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for AvlTreeMapIntoIterator<K, V> {
    fn len(&self) -> usize {
        self.entries.len()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for AvlTreeMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Ord, V: Clone> FromIterator<(K, V)> for AvlTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map = map.insert(key, value);
        }
        map
    }
}

impl<K: Clone + Ord, V: Clone> IntoIterator for AvlTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = AvlTreeMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let entries: Vec<(K, V)> = self
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        AvlTreeMapIntoIterator {
            entries: entries.into_iter(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a AvlTreeMap<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    type Item = (&'a K, &'a V);
    type IntoIter = AvlTreeMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Equality is by in-order content: two maps are equal iff their in-order
/// (key, value) sequences match position by position. Performed with two
/// cursors stepped in lockstep, short-circuiting when both maps share the
/// same root node.
impl<K: Clone + Ord, V: Clone + PartialEq> PartialEq for AvlTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.same_root(other) {
            return true;
        }
        if self.length != other.length {
            return false;
        }
        self.iter().eq(other.iter())
    }
}

impl<K: Clone + Ord, V: Clone + Eq> Eq for AvlTreeMap<K, V> {}

/// Maps order lexicographically by their in-order (key, value) sequences;
/// a map whose sequence is a strict prefix of another's sorts first.
impl<K: Clone + Ord, V: Clone + PartialOrd> PartialOrd for AvlTreeMap<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.same_root(other) {
            return Some(Ordering::Equal);
        }
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Clone + Ord, V: Clone + Ord> Ord for AvlTreeMap<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.same_root(other) {
            return Ordering::Equal;
        }
        self.iter().cmp(other.iter())
    }
}

/// Computes a hash value for this map.
///
/// The hash covers the length and every (key, value) pair in key order,
/// so insertion order does not affect the hash and equal maps hash
/// equally (Hash-Eq consistency).
impl<K, V> Hash for AvlTreeMap<K, V>
where
    K: Clone + Ord + Hash,
    V: Clone + Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: Clone + Ord + fmt::Debug, V: Clone + fmt::Debug> fmt::Debug for AvlTreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Clone + Ord + fmt::Display, V: Clone + fmt::Display> fmt::Display for AvlTreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for AvlTreeMap<K, V>
where
    K: serde::Serialize + Clone + Ord,
    V: serde::Serialize + Clone,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct AvlTreeMapVisitor<K, V> {
    key_marker: std::marker::PhantomData<K>,
    value_marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<K, V> AvlTreeMapVisitor<K, V> {
    const fn new() -> Self {
        Self {
            key_marker: std::marker::PhantomData,
            value_marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for AvlTreeMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Clone + Ord,
    V: serde::Deserialize<'de> + Clone,
{
    type Value = AvlTreeMap<K, V>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = AvlTreeMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map = map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for AvlTreeMap<K, V>
where
    K: serde::Deserialize<'de> + Clone + Ord,
    V: serde::Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(AvlTreeMapVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
