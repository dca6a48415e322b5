//! Terminal operations, which traverse a pipeline to produce a value.
//!
//! Operations that must reach the end of the sequence return [`Result`] and fail with
//! [`Error::Unbounded`] on an unbounded pipeline before invoking its producer. Short-circuiting operations such as
//! [`Pipeline::first`] or [`Pipeline::any`] are allowed on unbounded pipelines, and may not return if no element
//! decides them.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;
use std::iter::Sum;

use itertools::Itertools;

use crate::{Error, Pipeline, Result};

impl<T: Clone + 'static> Pipeline<T> {
    /// Calls `func` on each element.
    pub fn for_each(&self, func: impl FnMut(T)) -> Result<()> {
        self.ensure_bounded("for_each")?;
        self.iter().for_each(func);
        Ok(())
    }

    /// Collects the elements into a `Vec`.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.ensure_bounded("to_vec")?;
        Ok(self.traverse().into_vec())
    }

    /// Collects exactly `N` elements into an array.
    ///
    /// Returns [`Error::SizeMismatch`] if there are more or fewer.
    pub fn to_array<const N: usize>(&self) -> Result<[T; N]> {
        let vec = self.to_vec()?;
        let actual = vec.len();
        <[T; N]>::try_from(vec).map_err(|_| Error::SizeMismatch {
            expected: N,
            actual,
        })
    }

    /// Collects the elements into any [`FromIterator`] collection.
    pub fn collect<C: FromIterator<T>>(&self) -> Result<C> {
        self.ensure_bounded("collect")?;
        Ok(self.iter().collect())
    }

    /// Collects the distinct elements into a [`HashSet`].
    pub fn to_set(&self) -> Result<HashSet<T>>
    where
        T: Eq + Hash,
    {
        self.collect()
    }

    /// Groups the elements by `key_fn`, each group in traversal order.
    pub fn group_by_key<K: Eq + Hash>(
        &self,
        key_fn: impl FnMut(&T) -> K,
    ) -> Result<HashMap<K, Vec<T>>> {
        self.ensure_bounded("group_by_key")?;
        Ok(self.iter().into_group_map_by(key_fn))
    }

    /// The number of elements. Answered without traversing when the size is known.
    pub fn count(&self) -> Result<usize> {
        self.ensure_bounded("count")?;
        if let Some(len) = self.non_iterated_size() {
            tracing::trace!(len, "count answered without traversal");
            return Ok(len);
        }
        Ok(self.traverse().count())
    }

    /// Folds every element into an accumulator.
    pub fn fold<B>(&self, init: B, func: impl FnMut(B, T) -> B) -> Result<B> {
        self.ensure_bounded("fold")?;
        Ok(self.iter().fold(init, func))
    }

    /// Folds the elements with the first as the initial value. `None` if empty.
    pub fn reduce(&self, func: impl FnMut(T, T) -> T) -> Result<Option<T>> {
        self.ensure_bounded("reduce")?;
        Ok(self.iter().reduce(func))
    }

    /// Sums the elements.
    pub fn sum<S: Sum<T>>(&self) -> Result<S> {
        self.ensure_bounded("sum")?;
        Ok(self.iter().sum())
    }

    /// The first element.
    pub fn first(&self) -> Option<T> {
        self.take(1).iter().next()
    }

    /// The final element.
    pub fn last(&self) -> Result<Option<T>> {
        Ok(self.take_final(1)?.iter().next())
    }

    /// The element at `index`.
    pub fn nth(&self, index: usize) -> Option<T> {
        self.skip(index).first()
    }

    /// The first element matching `predicate`.
    pub fn find(&self, predicate: impl FnMut(&T) -> bool) -> Option<T> {
        self.iter().find(predicate)
    }

    /// The position of the first element matching `predicate`.
    pub fn position(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.iter().position(|item| predicate(&item))
    }

    /// Returns `true` if any element equals `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|item| item == *value)
    }

    /// Returns `true` if any element matches `predicate`.
    pub fn any(&self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        self.iter().any(|item| predicate(&item))
    }

    /// Returns `true` if every element matches `predicate`.
    pub fn all(&self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        self.iter().all(|item| predicate(&item))
    }

    /// The least element, the first among ties.
    pub fn min(&self) -> Result<Option<T>>
    where
        T: Ord,
    {
        self.ensure_bounded("min")?;
        Ok(self.iter().min())
    }

    /// The greatest element, the last among ties.
    pub fn max(&self) -> Result<Option<T>>
    where
        T: Ord,
    {
        self.ensure_bounded("max")?;
        Ok(self.iter().max())
    }

    /// The least element by `compare`, the first among ties.
    pub fn min_by(&self, compare: impl FnMut(&T, &T) -> Ordering) -> Result<Option<T>> {
        self.ensure_bounded("min_by")?;
        Ok(self.iter().min_by(compare))
    }

    /// The greatest element by `compare`, the last among ties.
    pub fn max_by(&self, compare: impl FnMut(&T, &T) -> Ordering) -> Result<Option<T>> {
        self.ensure_bounded("max_by")?;
        Ok(self.iter().max_by(compare))
    }

    /// The element with the least key, the first among ties.
    pub fn min_by_key<K: Ord>(&self, key_fn: impl FnMut(&T) -> K) -> Result<Option<T>> {
        self.ensure_bounded("min_by_key")?;
        Ok(self.iter().min_by_key(key_fn))
    }

    /// The element with the greatest key, the last among ties.
    pub fn max_by_key<K: Ord>(&self, key_fn: impl FnMut(&T) -> K) -> Result<Option<T>> {
        self.ensure_bounded("max_by_key")?;
        Ok(self.iter().max_by_key(key_fn))
    }

    /// Returns `true` if `self` and `other` yield equal elements in the same order.
    ///
    /// Known sizes that differ answer `false` without traversing. Fails with [`Error::Unbounded`] only if both
    /// sides are unbounded; a bounded side ends the comparison.
    pub fn sequence_equals(&self, other: &Pipeline<T>) -> Result<bool>
    where
        T: PartialEq,
    {
        if other.flags.unbounded {
            self.ensure_bounded("sequence_equals")?;
        }
        if let (Some(len), Some(other_len)) = (self.non_iterated_size(), other.non_iterated_size())
            && len != other_len
        {
            tracing::trace!(len, other_len, "sequence_equals answered by size");
            return Ok(false);
        }
        Ok(self.iter().eq(other.iter()))
    }

    /// Renders the elements separated by `separator`.
    pub fn join_string(&self, separator: &str) -> Result<String>
    where
        T: Display,
    {
        self.ensure_bounded("join_string")?;
        Ok(self.iter().join(separator))
    }

    /// Renders the elements separated by `separator`, between `prefix` and `suffix`.
    pub fn make_string(&self, prefix: &str, separator: &str, suffix: &str) -> Result<String>
    where
        T: Display,
    {
        Ok(format!("{}{}{}", prefix, self.join_string(separator)?, suffix))
    }
}

impl<K, V> Pipeline<(K, V)>
where
    K: Clone + Eq + Hash + 'static,
    V: Clone + 'static,
{
    /// Collects pairs into a [`HashMap`]. Later pairs replace earlier ones with the same key.
    pub fn to_map(&self) -> Result<HashMap<K, V>> {
        self.collect()
    }
}
