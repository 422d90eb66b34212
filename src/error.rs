use thiserror::Error;

/// A broken tree invariant, as reported by [`ThreadedAvlMap::validate`].
///
/// Nodes are identified by their slot in the map's node table.
///
/// [`ThreadedAvlMap::validate`]: crate::ThreadedAvlMap::validate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("node in slot {slot} is out of key order")]
    Order { slot: usize },

    #[error("node in slot {slot} stores height {stored}, subtrees give {computed}")]
    Height {
        slot: usize,
        stored: usize,
        computed: usize,
    },

    #[error("node in slot {slot} is unbalanced (left {left}, right {right})")]
    Balance {
        slot: usize,
        left: usize,
        right: usize,
    },

    #[error("right thread of node in slot {slot} does not lead to its inorder successor")]
    Thread { slot: usize },

    #[error("{reachable} nodes reachable from the root, map holds {len}")]
    Size { reachable: usize, len: usize },
}
