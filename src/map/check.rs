use super::{NodeId, Right, ThreadedAvlMap};
use crate::error::ConsistencyError;

impl<K: Ord, V> ThreadedAvlMap<K, V> {
    /// Checks every structural invariant of the tree: key order, stored
    /// heights, AVL balance, threads and node count.
    ///
    /// Only owning links are followed, so a broken thread cannot send the
    /// check into a cycle.
    pub fn validate(&self) -> Result<(), ConsistencyError> {
        let len = self.len();
        let mut reachable = 0;

        // Nodes with the exclusive key bounds their subtree has to respect
        let mut pending: Vec<(NodeId, Option<NodeId>, Option<NodeId>)> =
            self.root.map(|root| (root, None, None)).into_iter().collect();
        while let Some((id, lower, upper)) = pending.pop() {
            reachable += 1;
            if reachable > len {
                return Err(ConsistencyError::Size { reachable, len });
            }

            let node = self.node(id);
            let above_lower = lower.map_or(true, |lower| self.node(lower).key < node.key);
            let below_upper = upper.map_or(true, |upper| node.key < self.node(upper).key);
            if !above_lower || !below_upper {
                return Err(ConsistencyError::Order { slot: id.0 });
            }

            let left = self.left_height(id);
            let right = self.right_height(id);
            let computed = left.max(right);
            if node.height != computed {
                return Err(ConsistencyError::Height {
                    slot: id.0,
                    stored: node.height,
                    computed,
                });
            }
            if left > right + 1 || right > left + 1 {
                return Err(ConsistencyError::Balance {
                    slot: id.0,
                    left,
                    right,
                });
            }

            if let Some(left) = node.left {
                pending.push((left, lower, Some(id)));
            }
            if let Some(right) = node.right_child() {
                pending.push((right, Some(id), upper));
            }
        }
        if reachable != len {
            return Err(ConsistencyError::Size { reachable, len });
        }

        self.validate_threads()
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        if let Err(err) = self.validate() {
            panic!("inconsistent tree: {err}");
        }
    }

    /// Walks the tree inorder over owning links with an explicit stack and
    /// compares every thread with the node visited next.
    fn validate_threads(&self) -> Result<(), ConsistencyError> {
        let mut stack = Vec::new();
        let mut current = self.root;
        let mut previous: Option<NodeId> = None;
        loop {
            while let Some(id) = current {
                stack.push(id);
                current = self.node(id).left;
            }
            let Some(id) = stack.pop() else {
                break;
            };
            if let Some(previous) = previous {
                match self.node(previous).right {
                    Right::Thread(next) if next == id => {}
                    Right::Child(_) => {}
                    Right::Thread(_) | Right::End => {
                        return Err(ConsistencyError::Thread { slot: previous.0 });
                    }
                }
            }
            previous = Some(id);
            current = self.node(id).right_child();
        }

        match previous {
            Some(last) if self.node(last).right != Right::End => {
                Err(ConsistencyError::Thread { slot: last.0 })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{NodeId, Right, ThreadedAvlMap};
    use crate::error::ConsistencyError;

    fn sample() -> ThreadedAvlMap<i32, ()> {
        [2, 1, 3].into_iter().map(|k| (k, ())).collect()
    }

    fn slot_of(map: &ThreadedAvlMap<i32, ()>, key: i32) -> NodeId {
        map.find(&key).unwrap()
    }

    #[test]
    fn detects_wrong_height() {
        let mut map = sample();
        let id = slot_of(&map, 2);
        map.node_mut(id).height = 3;
        assert!(matches!(
            map.validate(),
            Err(ConsistencyError::Height {
                stored: 3,
                computed: 1,
                ..
            })
        ));
    }

    #[test]
    fn detects_stale_thread() {
        let mut map = sample();
        let one = slot_of(&map, 1);
        let three = slot_of(&map, 3);
        map.node_mut(one).right = Right::Thread(three);
        assert_eq!(
            map.validate(),
            Err(ConsistencyError::Thread { slot: one.0 })
        );

        let mut map = sample();
        let one = slot_of(&map, 1);
        let three = slot_of(&map, 3);
        map.node_mut(three).right = Right::Thread(one);
        assert_eq!(
            map.validate(),
            Err(ConsistencyError::Thread { slot: three.0 })
        );
    }

    #[test]
    fn detects_key_order() {
        let mut map = sample();
        let one = slot_of(&map, 1);
        map.node_mut(one).key = 5;
        assert_eq!(map.validate(), Err(ConsistencyError::Order { slot: one.0 }));
    }

    #[test]
    fn detects_imbalance() {
        let mut map: ThreadedAvlMap<i32, ()> = ThreadedAvlMap::new();
        // Hand-built chain 1 -> 2 -> 3 without rebalancing
        let mut trace = Vec::new();
        for key in 1..=3 {
            trace.clear();
            let slot = map.find_slot(&key, &mut trace).unwrap();
            map.link_leaf(slot, key, ());
        }
        map.node_mut(slot_of(&map, 2)).height = 1;
        let root = slot_of(&map, 1);
        map.node_mut(root).height = 2;
        assert_eq!(
            map.validate(),
            Err(ConsistencyError::Balance {
                slot: root.0,
                left: 0,
                right: 2
            })
        );
    }

    #[test]
    fn detects_unreachable_node() {
        let mut map = sample();
        let two = slot_of(&map, 2);
        map.node_mut(two).right = Right::End;
        assert_eq!(
            map.validate(),
            Err(ConsistencyError::Size {
                reachable: 2,
                len: 3
            })
        );
    }
}
