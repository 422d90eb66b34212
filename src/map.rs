//! An ordered map implemented with a right-threaded AVL tree.

use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::fmt;
use std::mem;

use tracing::{debug, trace};

mod check;
mod dump;
mod iter;

pub use dump::Dump;
pub use iter::{Iter, Keys, Range, Values};

/// An ordered map implemented with a right-threaded AVL tree.
///
/// Nodes live in a node table owned by the map and refer to each other by
/// slot. A node's right link either owns its right subtree or, when there is
/// none, threads to the node holding the next larger key.
///
/// ```
/// use threaded_avl::ThreadedAvlMap;
/// let mut map = ThreadedAvlMap::new();
/// map.insert(1, "one");
/// map.insert(2, "two");
/// map.insert(3, "three");
/// assert_eq!(map.get(&2), Some(&"two"));
/// assert_eq!(map.height(), Some(1));
/// assert!(!map.insert(2, "deux"));
/// assert_eq!(map.get(&2), Some(&"two"));
/// ```
pub struct ThreadedAvlMap<K, V> {
    nodes: Vec<Node<K, V>>,
    root: Option<NodeId>,
    cursor: Option<NodeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct NodeId(usize);

/// Right link of a node. Only `Child` owns the node it refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Right {
    Child(NodeId),
    /// Inorder successor.
    Thread(NodeId),
    /// Threaded, but this node holds the largest key.
    End,
}

struct Node<K, V> {
    key: K,
    value: V,
    left: Option<NodeId>,
    right: Right,
    height: usize,
}

/// Link that receives a newly inserted leaf.
enum Slot {
    Root,
    Left(NodeId),
    Right(NodeId),
}

impl<K, V> Node<K, V> {
    fn right_child(&self) -> Option<NodeId> {
        match self.right {
            Right::Child(right) => Some(right),
            Right::Thread(_) | Right::End => None,
        }
    }
}

impl<K, V> ThreadedAvlMap<K, V> {
    /// Creates an empty map.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            cursor: None,
        }
    }

    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the height of the tree, or `None` if the map is empty.
    /// A map holding a single element has height 0.
    pub fn height(&self) -> Option<usize> {
        self.root.map(|root| self.node(root).height)
    }

    /// Clears the map, deallocating all memory.
    /// A traversal started with [`begin`](Self::begin) ends as well.
    pub fn clear(&mut self) {
        debug!(len = self.nodes.len(), "clearing map");
        self.nodes.clear();
        self.root = None;
        self.cursor = None;
    }

    /// Returns the first key-value pair in the map, i.e. the one with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.root.map(|root| self.entry(self.leftmost(root)))
    }

    /// Returns the last key-value pair in the map, i.e. the one with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.root.map(|root| self.entry(self.rightmost(root)))
    }

    fn node(&self, id: NodeId) -> &Node<K, V> {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        &mut self.nodes[id.0]
    }

    fn entry(&self, id: NodeId) -> (&K, &V) {
        let node = self.node(id);
        (&node.key, &node.value)
    }

    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.node(id).left {
            id = left;
        }
        id
    }

    fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.node(id).right_child() {
            id = right;
        }
        id
    }

    /// Inorder successor: the thread itself, or the leftmost node of the right subtree.
    fn successor(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id).right {
            Right::Child(right) => Some(self.leftmost(right)),
            Right::Thread(next) => Some(next),
            Right::End => None,
        }
    }

    // Subtree heights are offset by one so that a missing subtree counts as 0.
    fn left_height(&self, id: NodeId) -> usize {
        match self.node(id).left {
            None => 0,
            Some(left) => self.node(left).height + 1,
        }
    }

    fn right_height(&self, id: NodeId) -> usize {
        match self.node(id).right_child() {
            None => 0,
            Some(right) => self.node(right).height + 1,
        }
    }

    fn adjust_height(&mut self, id: NodeId) {
        let height = cmp::max(self.left_height(id), self.right_height(id));
        self.node_mut(id).height = height;
    }

    /// Key, height and threading of every node in preorder.
    #[cfg(test)]
    pub(crate) fn preorder_shape(&self) -> Vec<(&K, usize, bool)> {
        let mut shape = Vec::with_capacity(self.len());
        let mut pending: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = pending.pop() {
            let node = self.node(id);
            shape.push((&node.key, node.height, node.right_child().is_none()));
            pending.extend(node.right_child());
            pending.extend(node.left);
        }
        shape
    }
}

impl<K: Ord, V> ThreadedAvlMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| &self.node(id).value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key)?;
        Some(&mut self.node_mut(id).value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| self.entry(id))
    }

    /// Returns true if the map contains a value for the given key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns a copy of the value for the key, or `V::default()` if the key is absent.
    pub fn get_or_default<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone + Default,
    {
        self.get(key).cloned().unwrap_or_default()
    }

    /// Returns the key the right link of the key's node leads to.
    ///
    /// That is the key of the real right child if the node has one, otherwise
    /// the threaded inorder successor. Returns `None` if the key is absent or
    /// is the largest key in the map.
    ///
    /// ```
    /// use threaded_avl::ThreadedAvlMap;
    /// let map: ThreadedAvlMap<_, _> = [(2, ()), (1, ()), (3, ())].into_iter().collect();
    /// assert_eq!(map.successor_key(&2), Some(&3));
    /// assert_eq!(map.successor_key(&1), Some(&2));
    /// assert_eq!(map.successor_key(&3), None);
    /// ```
    pub fn successor_key<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.node(self.find(key)?).right {
            Right::Child(next) | Right::Thread(next) => Some(&self.node(next).key),
            Right::End => None,
        }
    }

    /// Returns the height stored in the node holding the key, or `None` if the key is absent.
    pub fn height_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| self.node(id).height)
    }

    /// Inserts a key-value pair into the map.
    ///
    /// Returns false and leaves the map untouched if the key is already
    /// present; the stored value is not replaced.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let mut trace = Vec::new();
        let Some(slot) = self.find_slot(&key, &mut trace) else {
            trace!("key already present, insert ignored");
            return false;
        };
        let leaf = self.link_leaf(slot, key, value);
        trace!(node = leaf.0, depth = trace.len(), "inserted leaf");
        self.rebalance(trace);
        true
    }

    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.node(id);
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => break,
                Ordering::Less => node.left,
                // A thread never leads into a subtree
                Ordering::Greater => node.right_child(),
            };
        }
        current
    }

    /// Descends to the link a new leaf for `key` would hang off, pushing
    /// every visited node onto `trace`. Returns `None` if the key is present.
    fn find_slot(&self, key: &K, trace: &mut Vec<NodeId>) -> Option<Slot> {
        let mut slot = Slot::Root;
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.node(id);
            trace.push(id);
            match key.cmp(&node.key) {
                Ordering::Equal => return None,
                Ordering::Less => {
                    slot = Slot::Left(id);
                    current = node.left;
                }
                Ordering::Greater => {
                    slot = Slot::Right(id);
                    current = node.right_child();
                }
            }
        }
        Some(slot)
    }

    /// Hangs a new leaf off `slot` and threads it.
    fn link_leaf(&mut self, slot: Slot, key: K, value: V) -> NodeId {
        let id = NodeId(self.nodes.len());
        let right = match slot {
            Slot::Root => {
                self.root = Some(id);
                Right::End
            }
            Slot::Left(parent) => {
                // The parent was the smallest key above the new one
                self.node_mut(parent).left = Some(id);
                Right::Thread(parent)
            }
            Slot::Right(parent) => {
                // The leaf takes over the parent's thread
                let parent = self.node_mut(parent);
                debug_assert!(parent.right_child().is_none());
                mem::replace(&mut parent.right, Right::Child(id))
            }
        };
        self.nodes.push(Node {
            key,
            value,
            left: None,
            right,
            height: 0,
        });
        id
    }

    /// Walks the insertion trace bottom-up, adjusting heights and rotating
    /// where the subtree heights of a node differ by two.
    fn rebalance(&mut self, mut trace: Vec<NodeId>) {
        while let Some(id) = trace.pop() {
            let parent = trace.last().copied();
            let left_height = self.left_height(id);
            let right_height = self.right_height(id);
            let height = cmp::max(left_height, right_height);
            if height == self.node(id).height {
                // Ancestors are unaffected
                break;
            }

            let node = self.node(id);
            match (node.left, node.right) {
                (Some(left), _) if left_height > right_height + 1 => {
                    if self.right_height(left) > self.left_height(left) {
                        self.rotate_left(Some(id), left);
                    }
                    self.rotate_right(parent, id);
                }
                (_, Right::Child(right)) if right_height > left_height + 1 => {
                    if self.left_height(right) > self.right_height(right) {
                        self.rotate_right(Some(id), right);
                    }
                    self.rotate_left(parent, id);
                }
                _ => self.node_mut(id).height = height,
            }
        }
    }

    fn rotate_left(&mut self, parent: Option<NodeId>, id: NodeId) {
        let Right::Child(pivot) = self.node(id).right else {
            return;
        };
        let inner = self.node(pivot).left;
        self.node_mut(pivot).left = Some(id);
        self.node_mut(id).right = match inner {
            Some(inner) => Right::Child(inner),
            // The pivot is now the direct successor
            None => Right::Thread(pivot),
        };
        self.replace_child(parent, id, pivot);
        self.adjust_height(id);
        self.adjust_height(pivot);
        trace!(node = id.0, pivot = pivot.0, "rotated left");
    }

    fn rotate_right(&mut self, parent: Option<NodeId>, id: NodeId) {
        let Some(pivot) = self.node(id).left else {
            return;
        };
        // A thread on the pivot points at `id` and is replaced by the real link
        let inner = self.node(pivot).right_child();
        self.node_mut(pivot).right = Right::Child(id);
        self.node_mut(id).left = inner;
        self.replace_child(parent, id, pivot);
        self.adjust_height(id);
        self.adjust_height(pivot);
        trace!(node = id.0, pivot = pivot.0, "rotated right");
    }

    /// Re-points the link that owned `old` (parent's left or right, or the root) at `new`.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: NodeId) {
        match parent {
            None => self.root = Some(new),
            Some(parent) => {
                let parent = self.node_mut(parent);
                if parent.left == Some(old) {
                    parent.left = Some(new);
                } else {
                    debug_assert_eq!(parent.right, Right::Child(old));
                    parent.right = Right::Child(new);
                }
            }
        }
    }
}

impl<K: Ord + Clone, V: Clone> ThreadedAvlMap<K, V> {
    /// Inserts the nodes of `source` in preorder without rebalancing,
    /// which rebuilds the exact shape of the source tree.
    fn copy_from(&mut self, source: &Self) {
        self.nodes.reserve(source.len());
        let mut trace = Vec::new();
        let mut pending: Vec<NodeId> = source.root.into_iter().collect();
        while let Some(id) = pending.pop() {
            let node = source.node(id);
            trace.clear();
            if let Some(slot) = self.find_slot(&node.key, &mut trace) {
                let copy = self.link_leaf(slot, node.key.clone(), node.value.clone());
                self.node_mut(copy).height = node.height;
            }
            pending.extend(node.right_child());
            pending.extend(node.left);
        }
    }
}

impl<K: Ord + Clone, V: Clone> Clone for ThreadedAvlMap<K, V> {
    /// Returns a copy with the same shape and node heights as `self`.
    fn clone(&self) -> Self {
        let mut map = Self::new();
        map.copy_from(self);
        map
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.copy_from(source);
    }
}

impl<K, V> Default for ThreadedAvlMap<K, V> {
    /// Creates an empty map.
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ThreadedAvlMap<K, V> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for ThreadedAvlMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for ThreadedAvlMap<K, V> {}

impl<K: Ord, V> FromIterator<(K, V)> for ThreadedAvlMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for ThreadedAvlMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a ThreadedAvlMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
