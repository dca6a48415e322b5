//! [`BoundedSortedSeq`], a sorted multiset that can retain only its `K` least or greatest elements.

use std::collections::VecDeque;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Comparator, OrderedMap};

/// Which extreme a size-limited [`BoundedSortedSeq`] retains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Keep {
    /// Keep the greatest elements, evicting the least on overflow.
    Greatest,
    /// Keep the least elements, evicting the greatest on overflow.
    Least,
}

/// Size policy for a [`BoundedSortedSeq`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SizeLimit {
    /// The maximum number of elements retained after any push.
    pub max_size: usize,
    /// Which extreme is retained.
    pub keep: Keep,
}

impl SizeLimit {
    /// Retain the `max_size` least elements.
    pub const fn least(max_size: usize) -> Self {
        Self {
            max_size,
            keep: Keep::Least,
        }
    }

    /// Retain the `max_size` greatest elements.
    pub const fn greatest(max_size: usize) -> Self {
        Self {
            max_size,
            keep: Keep::Greatest,
        }
    }
}

/// A sorted sequence under a runtime [`Comparator`], optionally capped to its `K` least or greatest elements.
///
/// Equal-ranked values share a bucket that preserves arrival order, so iteration is a stable sort of everything
/// retained: ascending by `order`, ties in the order they were pushed.
///
/// With a [`SizeLimit`], a push onto a full sequence evicts one element from the extreme opposite
/// [`SizeLimit::keep`]. When keeping the least, ties at the boundary favor earlier arrivals; when keeping the
/// greatest, later arrivals. Either way the retained elements are exactly the head (or tail) of the stable sort of
/// every value ever pushed.
#[derive(Clone)]
pub struct BoundedSortedSeq<T> {
    /// Invariant: buckets are non-empty, and each bucket's key is a clone of its front element.
    buckets: OrderedMap<T, VecDeque<T>>,
    limit: Option<SizeLimit>,
    len: usize,
}

impl<T: Clone> BoundedSortedSeq<T> {
    /// Creates an unbounded sorted sequence.
    pub fn new(order: Comparator<T>) -> Self {
        Self {
            buckets: OrderedMap::new(order),
            limit: None,
            len: 0,
        }
    }

    /// Creates a sorted sequence that retains at most `limit.max_size` elements.
    pub fn with_limit(order: Comparator<T>, limit: SizeLimit) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new(order)
        }
    }

    /// The size policy, if any.
    pub fn limit(&self) -> Option<SizeLimit> {
        self.limit
    }

    /// The ordering.
    pub fn order(&self) -> &Comparator<T> {
        self.buckets.order()
    }

    /// Returns the number of retained elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no elements are retained.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if `value` would be the element evicted by pushing it onto a full sequence.
    fn evicts_itself(&self, value: &T, keep: Keep) -> bool {
        let order = self.buckets.order();
        match keep {
            // Appended behind any equal-ranked values, so it is popped back off the largest bucket.
            Keep::Least => self
                .buckets
                .last()
                .is_some_and(|(largest, _)| order(value, largest).is_ge()),
            // Equal-ranked values ahead of it are evicted first.
            Keep::Greatest => self
                .buckets
                .first()
                .is_some_and(|(smallest, _)| order(value, smallest).is_lt()),
        }
    }

    /// Inserts `value` after every equal-ranked value, then evicts if the sequence was already full.
    pub fn push(&mut self, value: T) {
        let full = self.limit.filter(|limit| limit.max_size <= self.len);
        if let Some(limit) = full
            && self.evicts_itself(&value, limit.keep)
        {
            return;
        }

        self.buckets
            .get_or_insert_with(value.clone(), VecDeque::new)
            .push_back(value);
        self.len += 1;

        if let Some(limit) = full {
            match limit.keep {
                Keep::Greatest => self.delete_smallest(),
                Keep::Least => self.delete_largest(),
            };
        }
    }

    /// Pushes every value of `values` in order.
    pub fn push_many(&mut self, values: impl IntoIterator<Item = T>) {
        for value in values {
            self.push(value);
        }
    }

    /// Removes the least element, the earliest arrival among ties.
    pub fn delete_smallest(&mut self) -> Option<T> {
        let (_, bucket) = self.buckets.first_mut()?;
        let value = bucket.pop_front()?;
        let new_front = bucket.front().cloned();
        self.len -= 1;
        match new_front {
            // Never anchor the bucket on a value it no longer holds.
            Some(new_key) => self.buckets.rekey_first(new_key),
            None => self.buckets.pop_first().is_some(),
        };
        Some(value)
    }

    /// Removes the greatest element, the latest arrival among ties.
    pub fn delete_largest(&mut self) -> Option<T> {
        let (_, bucket) = self.buckets.last_mut()?;
        let value = bucket.pop_back()?;
        let emptied = bucket.is_empty();
        self.len -= 1;
        if emptied {
            self.buckets.pop_last();
        }
        Some(value)
    }

    /// The least element.
    pub fn smallest(&self) -> Option<&T> {
        self.buckets.first().and_then(|(_, bucket)| bucket.front())
    }

    /// The greatest element.
    pub fn largest(&self) -> Option<&T> {
        self.buckets.last().and_then(|(_, bucket)| bucket.back())
    }

    /// Removes every element, keeping the order and limit.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.len = 0;
    }

    /// Iterates in ascending order, ties in arrival order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.buckets.values().flatten()
    }

    /// Consumes the sequence into a `Vec` in ascending order, ties in arrival order.
    pub fn into_vec(self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        for bucket in self.buckets.into_values() {
            out.extend(bucket);
        }
        out
    }
}

impl<T: Clone> Extend<T> for BoundedSortedSeq<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.push_many(iter);
    }
}

impl<T: Clone> IntoIterator for BoundedSortedSeq<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for BoundedSortedSeq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
