use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Bound, RangeBounds};

use super::{NodeId, ThreadedAvlMap};

/// An iterator over the entries of a map, sorted by key.
pub struct Iter<'a, K, V> {
    map: &'a ThreadedAvlMap<K, V>,
    front: Option<NodeId>,
    remaining: usize,
}

/// An iterator over the keys of a map, in sorted order.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of a map, in order of their keys.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over a sub-range of entries of a map.
///
/// Both ends are located once when the range is created; stepping between
/// them only follows right links and threads.
pub struct Range<'a, K, V> {
    map: &'a ThreadedAvlMap<K, V>,
    front: Option<NodeId>,
    back: Option<NodeId>,
}

impl<K, V> ThreadedAvlMap<K, V> {
    /// Starts an inorder traversal with the map's built-in cursor.
    ///
    /// The following call to [`next`](Self::next) returns the smallest key.
    /// Calling `begin` again restarts the traversal.
    ///
    /// ```
    /// use threaded_avl::ThreadedAvlMap;
    /// let mut map: ThreadedAvlMap<_, _> = [(3, ()), (1, ()), (2, ())].into_iter().collect();
    /// map.begin();
    /// assert_eq!(map.next(), Some(&1));
    /// assert_eq!(map.next(), Some(&2));
    /// assert_eq!(map.next(), Some(&3));
    /// assert_eq!(map.next(), None);
    /// ```
    pub fn begin(&mut self) {
        self.cursor = self.root.map(|root| self.leftmost(root));
    }

    /// Returns the key under the cursor and advances the cursor to the next key.
    ///
    /// Returns `None` once the traversal is exhausted, or if it was never
    /// started with [`begin`](Self::begin).
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&K> {
        let id = self.cursor?;
        self.cursor = self.successor(id);
        Some(&self.node(id).key)
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            map: self,
            front: self.root.map(|root| self.leftmost(root)),
            remaining: self.len(),
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

impl<K: Ord, V> ThreadedAvlMap<K, V> {
    /// Gets an iterator over a sub-range of entries in the map, sorted by key.
    ///
    /// A range whose start lies above its end yields nothing.
    ///
    /// ```
    /// use threaded_avl::ThreadedAvlMap;
    /// let map: ThreadedAvlMap<_, _> = (0..10).map(|k| (k, k * k)).collect();
    /// let squares: Vec<_> = map.range(3..6).map(|(_, v)| *v).collect();
    /// assert_eq!(squares, vec![9, 16, 25]);
    /// ```
    pub fn range<Q, R>(&self, range: R) -> Range<'_, K, V>
    where
        K: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: Ord + ?Sized,
    {
        let front = self.lower_bound(range.start_bound());
        let back = self.upper_bound(range.end_bound());
        match (front, back) {
            (Some(front), Some(back)) if self.node(front).key <= self.node(back).key => Range {
                map: self,
                front: Some(front),
                back: Some(back),
            },
            _ => Range {
                map: self,
                front: None,
                back: None,
            },
        }
    }

    /// Returns all keys in `[lower, upper]` in sorted order.
    ///
    /// The result is empty if `lower > upper`. Takes `O(log n + m)` steps
    /// for `m` returned keys.
    pub fn range_search<Q>(&self, lower: &Q, upper: &Q) -> Vec<K>
    where
        K: Borrow<Q> + Clone,
        Q: Ord + ?Sized,
    {
        if lower > upper {
            return Vec::new();
        }
        self.range::<Q, _>((Bound::Included(lower), Bound::Included(upper)))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// First node above the bound: the last node at which the descent turned left.
    fn lower_bound<Q>(&self, bound: Bound<&Q>) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (key, inclusive) = match bound {
            Bound::Unbounded => return self.root.map(|root| self.leftmost(root)),
            Bound::Included(key) => (key, true),
            Bound::Excluded(key) => (key, false),
        };
        let mut candidate = None;
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.node(id);
            match key.cmp(node.key.borrow()) {
                Ordering::Equal if inclusive => return Some(id),
                Ordering::Less => {
                    candidate = Some(id);
                    current = node.left;
                }
                _ => current = node.right_child(),
            }
        }
        candidate
    }

    /// Last node below the bound: the last node at which the descent turned right.
    fn upper_bound<Q>(&self, bound: Bound<&Q>) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (key, inclusive) = match bound {
            Bound::Unbounded => return self.root.map(|root| self.rightmost(root)),
            Bound::Included(key) => (key, true),
            Bound::Excluded(key) => (key, false),
        };
        let mut candidate = None;
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.node(id);
            match key.cmp(node.key.borrow()) {
                Ordering::Equal if inclusive => return Some(id),
                Ordering::Greater => {
                    candidate = Some(id);
                    current = node.right_child();
                }
                _ => current = node.left,
            }
        }
        candidate
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.front?;
        self.front = self.map.successor(id);
        self.remaining -= 1;
        Some(self.map.entry(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

// Derived clone would require K: Clone and V: Clone
impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            map: self.map,
            front: self.front,
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.front?;
        if self.back == Some(id) {
            self.front = None;
            self.back = None;
        } else {
            self.front = self.map.successor(id);
        }
        Some(self.map.entry(id))
    }
}

impl<K, V> FusedIterator for Range<'_, K, V> {}

impl<K, V> Clone for Range<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            map: self.map,
            front: self.front,
            back: self.back,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Range<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
