use std::fmt;

use super::{Right, ThreadedAvlMap};

/// Diagnostic listing of a map's nodes, created by [`ThreadedAvlMap::dump`].
///
/// Displays one line per node in key order: `(key,value,height)`, or
/// `(key,value,height,next)` for a node threaded to the node holding `next`.
pub struct Dump<'a, K, V> {
    map: &'a ThreadedAvlMap<K, V>,
}

impl<K, V> ThreadedAvlMap<K, V> {
    /// Returns a displayable listing of every node with its height and thread.
    ///
    /// ```
    /// use threaded_avl::ThreadedAvlMap;
    /// let map: ThreadedAvlMap<_, _> = [(2, 'b'), (1, 'a'), (3, 'c')].into_iter().collect();
    /// assert_eq!(map.dump().to_string(), "(1,a,0,2)\n(2,b,1)\n(3,c,0)\n");
    /// ```
    pub fn dump(&self) -> Dump<'_, K, V> {
        Dump { map: self }
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Dump<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let map = self.map;
        let mut current = map.root.map(|root| map.leftmost(root));
        while let Some(id) = current {
            let node = map.node(id);
            match node.right {
                Right::Thread(next) => writeln!(
                    f,
                    "({},{},{},{})",
                    node.key,
                    node.value,
                    node.height,
                    map.node(next).key
                )?,
                Right::Child(_) | Right::End => {
                    writeln!(f, "({},{},{})", node.key, node.value, node.height)?
                }
            }
            current = map.successor(id);
        }
        Ok(())
    }
}
