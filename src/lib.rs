//! An ordered map and set implemented with a right-threaded AVL tree.
//!
//! Every node without a real right subtree keeps a *thread* to its inorder
//! successor instead of an empty link. Walking the tree in key order then
//! needs neither parent links nor a stack, and range queries cost
//! `O(log n + m)` for `m` returned keys.
//!
//! ```
//! use threaded_avl::ThreadedAvlMap;
//!
//! let mut map = ThreadedAvlMap::new();
//! for key in [50, 30, 70, 20, 40, 60, 80] {
//!     map.insert(key, key * 10);
//! }
//! assert_eq!(map.get(&40), Some(&400));
//! assert_eq!(map.range_search(&25, &65), vec![30, 40, 50, 60]);
//!
//! map.begin();
//! let mut keys = Vec::new();
//! while let Some(key) = map.next() {
//!     keys.push(*key);
//! }
//! assert_eq!(keys, vec![20, 30, 40, 50, 60, 70, 80]);
//! ```

pub mod error;
pub mod map;
pub mod set;

pub use error::ConsistencyError;
pub use map::ThreadedAvlMap;
pub use set::ThreadedAvlSet;
