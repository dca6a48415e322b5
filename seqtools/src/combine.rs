//! Combinators over two pipelines.

use itertools::{EitherOrBoth, Itertools};

use crate::{Pipeline, Traversal, once};

impl<T: Clone + 'static> Pipeline<T> {
    /// Builds a pipeline traversing `self` and `other` together.
    fn combine<U, R, I>(
        &self,
        other: &Pipeline<U>,
        unbounded: bool,
        size: impl Fn(usize, usize) -> Option<usize> + 'static,
        combine: impl Fn(Pipeline<T>, Pipeline<U>) -> I + 'static,
    ) -> Pipeline<R>
    where
        U: Clone + 'static,
        R: Clone + 'static,
        I: Iterator<Item = R> + 'static,
    {
        let flags = self.flags.lazy_union(other.flags).with_unbounded(unbounded);
        let (first, second) = (self.clone(), other.clone());
        let (first_sized, second_sized) = (self.clone(), other.clone());
        Pipeline::new(
            move || Traversal::cursor(combine(first.clone(), second.clone())),
            move || size(first_sized.non_iterated_size()?, second_sized.non_iterated_size()?),
            flags,
        )
    }

    /// Yields the elements of `self`, then those of `other`.
    ///
    /// Unbounded if either side is.
    pub fn concat(&self, other: &Pipeline<T>) -> Pipeline<T> {
        self.combine(
            other,
            self.flags.unbounded || other.flags.unbounded,
            usize::checked_add,
            |first, second| first.iter().chain(second.iter()),
        )
    }

    /// Yields the elements of `self`, then `value`.
    pub fn append_value(&self, value: T) -> Pipeline<T> {
        self.concat(&once(value))
    }

    /// Yields `value`, then the elements of `self`.
    pub fn prepend_value(&self, value: T) -> Pipeline<T> {
        once(value).concat(self)
    }

    /// Alternates elements of `self` and `other`, starting with `self`. The rest of the longer side follows.
    pub fn interleave(&self, other: &Pipeline<T>) -> Pipeline<T> {
        self.combine(
            other,
            self.flags.unbounded || other.flags.unbounded,
            usize::checked_add,
            |first, second| first.iter().interleave(second.iter()),
        )
    }

    /// Pairs up elements of `self` and `other`, stopping at the end of the shorter side.
    ///
    /// Unbounded only if both sides are.
    pub fn zip<U: Clone + 'static>(&self, other: &Pipeline<U>) -> Pipeline<(T, U)> {
        self.combine(
            other,
            self.flags.unbounded && other.flags.unbounded,
            |a, b| Some(a.min(b)),
            |first, second| first.iter().zip(second.iter()),
        )
    }

    /// Pairs up elements of `self` and `other`, continuing to the end of the longer side.
    pub fn zip_longest<U: Clone + 'static>(
        &self,
        other: &Pipeline<U>,
    ) -> Pipeline<EitherOrBoth<T, U>> {
        self.combine(
            other,
            self.flags.unbounded || other.flags.unbounded,
            |a, b| Some(a.max(b)),
            |first, second| first.iter().zip_longest(second.iter()),
        )
    }
}
