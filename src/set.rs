//! An ordered set implemented with a right-threaded AVL tree.

use std::borrow::Borrow;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::RangeBounds;

use crate::error::ConsistencyError;
use crate::map::{Keys as MapKeys, Range as MapRange, ThreadedAvlMap};

/// An ordered set implemented with a right-threaded AVL tree.
///
/// ```
/// use threaded_avl::ThreadedAvlSet;
/// let mut set = ThreadedAvlSet::new();
/// set.insert(3);
/// set.insert(1);
/// set.insert(2);
/// assert!(set.contains(&1));
/// assert_eq!(set.range_search(&2, &9), vec![2, 3]);
/// ```
#[derive(PartialEq, Eq)]
pub struct ThreadedAvlSet<T> {
    map: ThreadedAvlMap<T, ()>,
}

/// An iterator over the values of a set.
pub struct Iter<'a, T> {
    map_keys: MapKeys<'a, T, ()>,
}

/// An iterator over a range of values of a set.
pub struct Range<'a, T> {
    map_range: MapRange<'a, T, ()>,
}

impl<T: Ord> ThreadedAvlSet<T> {
    /// Creates an empty set.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            map: ThreadedAvlMap::new(),
        }
    }

    /// Returns a reference to the value in the set that is equal to the given value.
    ///
    /// The value may be any borrowed form of the set's value type, but the ordering
    /// on the borrowed form *must* match the ordering on the value type.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.get_key_value(value).map(|kv| kv.0)
    }

    /// Returns true if the set contains a value.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.contains_key(value)
    }

    /// Inserts a value into the set.
    /// Returns whether the value was newly inserted.
    pub fn insert(&mut self, value: T) -> bool {
        self.map.insert(value, ())
    }

    /// Gets an iterator over a sub-range of values in the set in sorted order.
    pub fn range<Q, R>(&self, range: R) -> Range<'_, T>
    where
        T: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: Ord + ?Sized,
    {
        Range {
            map_range: self.map.range(range),
        }
    }

    /// Returns all values in `[lower, upper]` in sorted order,
    /// or nothing if `lower > upper`.
    pub fn range_search<Q>(&self, lower: &Q, upper: &Q) -> Vec<T>
    where
        T: Borrow<Q> + Clone,
        Q: Ord + ?Sized,
    {
        self.map.range_search(lower, upper)
    }

    /// Checks the structural invariants of the underlying tree.
    pub fn validate(&self) -> Result<(), ConsistencyError> {
        self.map.validate()
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        self.map.check_consistency()
    }
}

impl<T> ThreadedAvlSet<T> {
    /// Returns true if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns the height of the underlying tree, or `None` if the set is empty.
    pub fn height(&self) -> Option<usize> {
        self.map.height()
    }

    /// Clears the set, deallocating all memory.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns the smallest value in the set.
    pub fn first(&self) -> Option<&T> {
        self.map.first_key_value().map(|kv| kv.0)
    }

    /// Returns the largest value in the set.
    pub fn last(&self) -> Option<&T> {
        self.map.last_key_value().map(|kv| kv.0)
    }

    /// Gets an iterator over the values of the set in sorted order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            map_keys: self.map.keys(),
        }
    }
}

impl<T: Ord + Clone> Clone for ThreadedAvlSet<T> {
    /// Returns a copy with the same tree shape as `self`.
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.map.clone_from(&source.map);
    }
}

impl<T> Default for ThreadedAvlSet<T> {
    /// Creates an empty set.
    fn default() -> Self {
        Self {
            map: ThreadedAvlMap::default(),
        }
    }
}

impl<T: Ord> FromIterator<T> for ThreadedAvlSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for ThreadedAvlSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ThreadedAvlSet<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a ThreadedAvlSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Derived clone would require T: Clone
impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            map_keys: self.map_keys.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.map_keys.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.map_keys.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Range<'_, T> {
    fn clone(&self) -> Self {
        Self {
            map_range: self.map_range.clone(),
        }
    }
}

impl<'a, T> Iterator for Range<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.map_range.next().map(|(k, _)| k)
    }
}

impl<T> FusedIterator for Range<'_, T> {}
