//! Deferred sorting: [`SortedPipeline`] and the bounded top-`k` operations built on it.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use seqstore::{BoundedSortedSeq, Comparator, Keep, SizeLimit, order};

use crate::pipeline::Variant;
use crate::{Flags, Pipeline, Result, Traversal, TraversalIter};

/// What a sorted pipeline sorts, and by which chain of orders.
pub(crate) struct SortState<T> {
    original: Pipeline<T>,
    orders: Rc<[Comparator<T>]>,
}

impl<T: Clone + 'static> SortState<T> {
    fn build(original: Pipeline<T>, orders: Rc<[Comparator<T>]>) -> SortedPipeline<T> {
        let state = Rc::new(Self { original, orders });
        let producer = state.clone();
        let sized = state.clone();
        let pipeline = Pipeline::new(
            move || {
                let order = order::chain(producer.orders.clone());
                let mut vec = producer.original.traverse().into_vec();
                vec.sort_by(|a, b| order(a, b));
                Traversal::Owned(vec)
            },
            move || sized.original.non_iterated_size(),
            Flags::MATERIALIZED,
        )
        .with_variant(Variant::Sorted(state.clone()));
        SortedPipeline { pipeline, state }
    }

    /// The `k` least or greatest elements in sorted order, without sorting everything.
    pub(crate) fn bounded(&self, k: usize, keep: Keep) -> Pipeline<T> {
        tracing::trace!(k, ?keep, "answering sorted slice with a bounded sorted sequence");
        let original = self.original.clone();
        let sized = self.original.clone();
        let orders = self.orders.clone();
        Pipeline::new(
            move || {
                let limit = SizeLimit { max_size: k, keep };
                let mut seq = BoundedSortedSeq::with_limit(order::chain(orders.clone()), limit);
                seq.extend(original.iter());
                Traversal::Owned(seq.into_vec())
            },
            move || sized.non_iterated_size().map(|len| len.min(k)),
            Flags::MATERIALIZED,
        )
    }
}

/// A [`Pipeline`] whose elements are sorted when a traversal starts.
///
/// Dereferences to the sorted [`Pipeline`]. Sorting is stable: elements that tie under every order keep their
/// relative order. [`take`](Pipeline::take) and [`take_final`](Pipeline::take_final) on a sorted pipeline keep only
/// the `k` least or greatest elements while traversing, rather than sorting the whole sequence first.
#[must_use = "pipelines are lazy and do nothing unless consumed"]
pub struct SortedPipeline<T> {
    pipeline: Pipeline<T>,
    state: Rc<SortState<T>>,
}

impl<T> Clone for SortedPipeline<T> {
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T> Deref for SortedPipeline<T> {
    type Target = Pipeline<T>;

    fn deref(&self) -> &Self::Target {
        &self.pipeline
    }
}

impl<T: Clone + 'static> SortedPipeline<T> {
    /// Breaks remaining ties with `order`.
    pub fn then_with(&self, order: Comparator<T>) -> Self {
        let orders = self
            .state
            .orders
            .iter()
            .cloned()
            .chain([order])
            .collect::<Rc<[_]>>();
        SortState::build(self.state.original.clone(), orders)
    }

    /// Breaks remaining ties with `compare`.
    pub fn then_by(&self, compare: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        self.then_with(order::from_fn(compare))
    }

    /// Breaks remaining ties with `compare`, descending.
    pub fn then_by_descending(&self, compare: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        self.then_with(order::reverse(order::from_fn(compare)))
    }

    /// Breaks remaining ties by `key_fn`.
    pub fn then_by_key<K: Ord>(&self, key_fn: impl Fn(&T) -> K + 'static) -> Self {
        self.then_with(order::by_key(key_fn))
    }

    /// Breaks remaining ties by `key_fn`, descending.
    pub fn then_by_key_descending<K: Ord>(&self, key_fn: impl Fn(&T) -> K + 'static) -> Self {
        self.then_with(order::reverse(order::by_key(key_fn)))
    }

    /// Unwraps the sorted [`Pipeline`].
    pub fn into_pipeline(self) -> Pipeline<T> {
        self.pipeline
    }
}

impl<T> fmt::Debug for SortedPipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedPipeline")
            .field("orders", &self.state.orders.len())
            .field("pipeline", &self.pipeline)
            .finish()
    }
}

impl<T: Clone + 'static> IntoIterator for &SortedPipeline<T> {
    type Item = T;
    type IntoIter = TraversalIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone + 'static> Pipeline<T> {
    /// Sorts by `order` when traversed.
    ///
    /// Returns [`Error::Unbounded`](crate::Error::Unbounded) if `self` is unbounded.
    pub fn sort_with(&self, order: Comparator<T>) -> Result<SortedPipeline<T>> {
        self.ensure_bounded("sort")?;
        Ok(SortState::build(self.clone(), Rc::from([order])))
    }

    /// Sorts ascending.
    pub fn sort(&self) -> Result<SortedPipeline<T>>
    where
        T: Ord,
    {
        self.sort_with(order::natural())
    }

    /// Sorts descending.
    pub fn sort_descending(&self) -> Result<SortedPipeline<T>>
    where
        T: Ord,
    {
        self.sort_with(order::natural_descending())
    }

    /// Sorts by `compare`.
    pub fn sort_by(
        &self,
        compare: impl Fn(&T, &T) -> Ordering + 'static,
    ) -> Result<SortedPipeline<T>> {
        self.sort_with(order::from_fn(compare))
    }

    /// Sorts by the key `key_fn` extracts.
    pub fn sort_by_key<K: Ord>(
        &self,
        key_fn: impl Fn(&T) -> K + 'static,
    ) -> Result<SortedPipeline<T>> {
        self.sort_with(order::by_key(key_fn))
    }

    /// The `k` least elements, ascending, ties in arrival order.
    ///
    /// Equivalent to `self.sort()?.take(k)`: the elements pass through a [`BoundedSortedSeq`] holding at most `k`
    /// of them, so the sequence is never fully sorted.
    pub fn min_k(&self, k: usize) -> Result<Pipeline<T>>
    where
        T: Ord,
    {
        Ok(self.sort()?.take(k))
    }

    /// The `k` least elements by `compare`, ascending.
    pub fn min_k_by(
        &self,
        k: usize,
        compare: impl Fn(&T, &T) -> Ordering + 'static,
    ) -> Result<Pipeline<T>> {
        Ok(self.sort_by(compare)?.take(k))
    }

    /// The `k` elements with the least keys, ascending.
    pub fn min_k_by_key<K: Ord>(
        &self,
        k: usize,
        key_fn: impl Fn(&T) -> K + 'static,
    ) -> Result<Pipeline<T>> {
        Ok(self.sort_by_key(key_fn)?.take(k))
    }

    /// The `k` greatest elements, ascending.
    ///
    /// Equivalent to `self.sort()?.take_final(k)`.
    pub fn max_k(&self, k: usize) -> Result<Pipeline<T>>
    where
        T: Ord,
    {
        self.sort()?.take_final(k)
    }

    /// The `k` greatest elements by `compare`, ascending.
    pub fn max_k_by(
        &self,
        k: usize,
        compare: impl Fn(&T, &T) -> Ordering + 'static,
    ) -> Result<Pipeline<T>> {
        self.sort_by(compare)?.take_final(k)
    }

    /// The `k` elements with the greatest keys, ascending.
    pub fn max_k_by_key<K: Ord>(
        &self,
        k: usize,
        key_fn: impl Fn(&T) -> K + 'static,
    ) -> Result<Pipeline<T>> {
        self.sort_by_key(key_fn)?.take_final(k)
    }
}
