//! # arbora
//!
//! Persistent AVL tree collections: immutable ordered maps and sets with
//! structural sharing.
//!
//! ## Overview
//!
//! This library provides two collection types backed by a persistent
//! (immutable) AVL tree:
//!
//! - [`AvlTreeMap`]: an immutable ordered map
//! - [`AvlTreeSet`]: an immutable ordered set
//!
//! Every "mutating" operation returns a new collection value; the original
//! value and every previously obtained version remain valid and unchanged.
//! Versions share all untouched subtrees, so an insert or remove allocates
//! only the O(log N) path from the root to the affected node.
//!
//! ## Feature Flags
//!
//! - `arc`: use `std::sync::Arc` instead of `std::rc::Rc` for node handles,
//!   making tree values shareable across threads
//! - `serde`: `Serialize`/`Deserialize` implementations for both collections
//!
//! ## Example
//!
//! ```rust
//! use arbora::persistent::AvlTreeMap;
//!
//! let map = AvlTreeMap::new()
//!     .insert(2, "two")
//!     .insert(1, "one")
//!     .insert(3, "three");
//!
//! let trimmed = map.remove(&2);
//!
//! // The original version is untouched by the removal
//! assert_eq!(map.get(&2), Some(&"two"));
//! assert_eq!(trimmed.get(&2), None);
//!
//! // Iteration is always in ascending key order
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod persistent;

pub use persistent::AvlTreeMap;
pub use persistent::AvlTreeSet;
