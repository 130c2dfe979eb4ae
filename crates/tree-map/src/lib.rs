//! Ordered map on an arena-backed binary search tree.
//!
//! Keys are ordered by a three-way comparator supplied at construction
//! (`Ord::cmp` by default). The tree is not balanced. Every node keeps a
//! parent index next to its child indices, which lets in-order traversal
//! walk the tree without a stack: the successor of a node is the leftmost
//! node of its right subtree, or else the first ancestor reached from a left
//! child.
//!
//! Positions are explicit [`Cursor`] values rather than state stored in the
//! map, so independent traversals of one map cannot disturb each other.
//!
//! ```
//! use tree_map::TreeMap;
//!
//! let mut map = TreeMap::new();
//! for k in [5, 3, 8, 1, 4, 7, 9] {
//!     map.insert(k, k * 10);
//! }
//! map.erase(&5);
//!
//! let keys: Vec<i32> = map.keys().copied().collect();
//! assert_eq!(keys, [1, 3, 4, 7, 8, 9]);
//! assert_eq!(map.upper_bound(&6).map(|e| *e.key()), Some(7));
//! assert!(map.upper_bound(&10).is_none());
//! ```
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`types`] | [`Node`] link trait and [`KvNode`] |
//! [`arena`] | Slot store with free-list reuse and generations |
//! [`tree_node`] | [`TreeNode`] and [`Entry`] |
//! [`util`] | `first`, `next`, `locate`, `upper_bound`, `splice` … over the arena |
//! [`tree_map`] | [`TreeMap`] and its iterator |

pub mod arena;
pub mod cursor;
pub mod error;
pub mod tree_map;
pub mod tree_node;
pub mod types;
pub mod util;

pub use cursor::Cursor;
pub use error::TreeMapError;
pub use tree_map::{Iter, TreeMap};
pub use tree_node::{Entry, TreeNode};
pub use types::{KvNode, Node};
