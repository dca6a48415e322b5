//! Lazy element-wise adaptors.
//!
//! Each adaptor wraps the previous pipeline's traversal in an iterator adaptor. Results are never fresh, inherit
//! the source's [`Flags::expensive_produce`](crate::Flags::expensive_produce) and
//! [`Flags::unbounded`](crate::Flags::unbounded), and only report a size when it follows from the source's.

use std::hash::Hash;
use std::rc::Rc;

use itertools::Itertools;

use crate::{Error, Pipeline, Result, Traversal, TraversalIter};

impl<T: Clone + 'static> Pipeline<T> {
    /// Keeps the elements matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Pipeline<T> {
        let predicate = Rc::new(predicate);
        self.derive_iter(
            self.flags.lazy(),
            |_| None,
            move |iter| {
                let predicate = predicate.clone();
                iter.filter(move |item| predicate(item))
            },
        )
    }

    /// Maps each element with `func`, keeping the `Some` results.
    pub fn filter_map<R: Clone + 'static>(
        &self,
        func: impl Fn(T) -> Option<R> + 'static,
    ) -> Pipeline<R> {
        let func = Rc::new(func);
        self.derive_iter(
            self.flags.lazy(),
            |_| None,
            move |iter| {
                let func = func.clone();
                iter.filter_map(move |item| func(item))
            },
        )
    }

    /// Maps each element to an iterable with `func` and flattens the results.
    pub fn flat_map<R, I>(&self, func: impl Fn(T) -> I + 'static) -> Pipeline<R>
    where
        R: Clone + 'static,
        I: IntoIterator<Item = R> + 'static,
        I::IntoIter: 'static,
    {
        let func = Rc::new(func);
        self.derive_iter(
            self.flags.lazy(),
            |_| None,
            move |iter| {
                let func = func.clone();
                iter.flat_map(move |item| func(item))
            },
        )
    }

    /// Calls `func` on each element as it passes.
    pub fn inspect(&self, func: impl Fn(&T) + 'static) -> Pipeline<T> {
        let func = Rc::new(func);
        self.derive_iter(self.flags.lazy(), Self::non_iterated_size, move |iter| {
            let func = func.clone();
            iter.inspect(move |item| func(item))
        })
    }

    /// Pairs each element with its position.
    pub fn enumerate(&self) -> Pipeline<(usize, T)> {
        self.derive_iter(
            self.flags.lazy(),
            Self::non_iterated_size,
            TraversalIter::enumerate,
        )
    }

    /// Yields elements while `predicate` holds, then stops.
    pub fn take_while(&self, predicate: impl Fn(&T) -> bool + 'static) -> Pipeline<T> {
        let predicate = Rc::new(predicate);
        self.derive_iter(
            self.flags.lazy(),
            |_| None,
            move |iter| {
                let predicate = predicate.clone();
                iter.take_while(move |item| predicate(item))
            },
        )
    }

    /// Drops elements while `predicate` holds, then yields the rest.
    pub fn skip_while(&self, predicate: impl Fn(&T) -> bool + 'static) -> Pipeline<T> {
        let predicate = Rc::new(predicate);
        self.derive_iter(
            self.flags.lazy(),
            |_| None,
            move |iter| {
                let predicate = predicate.clone();
                iter.skip_while(move |item| predicate(item))
            },
        )
    }

    /// Yields every `step`th element, starting with the first.
    ///
    /// Returns [`Error::InvalidArgument`] if `step` is zero.
    pub fn step_by(&self, step: usize) -> Result<Pipeline<T>> {
        if step == 0 {
            return Err(Error::InvalidArgument {
                name: "step",
                reason: "must be at least 1",
            });
        }
        Ok(self.derive_iter(
            self.flags.lazy(),
            move |parent| parent.non_iterated_size().map(|len| len.div_ceil(step)),
            move |iter| iter.step_by(step),
        ))
    }

    /// Drops elements equal to the one before them.
    pub fn dedup(&self) -> Pipeline<T>
    where
        T: PartialEq,
    {
        self.derive_iter(self.flags.lazy(), |_| None, Itertools::dedup)
    }

    /// Drops elements equal to any earlier element.
    pub fn unique(&self) -> Pipeline<T>
    where
        T: Eq + Hash,
    {
        self.derive_iter(self.flags.lazy(), |_| None, Itertools::unique)
    }

    /// Threads a state through the elements, yielding `func`'s results until it returns `None`.
    ///
    /// Each traversal starts from a clone of `initial`.
    pub fn scan<S, R>(&self, initial: S, func: impl Fn(&mut S, T) -> Option<R> + 'static) -> Pipeline<R>
    where
        S: Clone + 'static,
        R: Clone + 'static,
    {
        let func = Rc::new(func);
        self.derive_iter(
            self.flags.lazy(),
            |_| None,
            move |iter| {
                let func = func.clone();
                iter.scan(initial.clone(), move |state, item| func(state, item))
            },
        )
    }

    /// Replays the sequence `times` times, traversing `self` once per pass.
    pub fn repeat(&self, times: usize) -> Pipeline<T> {
        let flags = if times == 0 {
            self.flags.lazy_bounded()
        } else {
            self.flags.lazy()
        };
        let parent = self.clone();
        let sized = self.clone();
        Pipeline::new(
            move || {
                let parent = parent.clone();
                Traversal::cursor((0..times).flat_map(move |_| parent.iter()))
            },
            move || match times {
                0 => Some(0),
                _ => sized.non_iterated_size()?.checked_mul(times),
            },
            flags,
        )
    }

    /// Replays the sequence without end.
    ///
    /// Each pass is a new traversal of `self`. Iteration ends if a pass yields nothing. A pipeline known to be
    /// empty or already unbounded is returned as is.
    pub fn cycle(&self) -> Pipeline<T> {
        if self.flags.unbounded || self.non_iterated_size() == Some(0) {
            return self.clone();
        }
        let parent = self.clone();
        self.derive_iter(
            self.flags.lazy().with_unbounded(true),
            |_| None,
            move |current| Cycle {
                source: parent.clone(),
                current,
                yielded: false,
            },
        )
    }
}

/// Restarts `source` each time a pass ends.
struct Cycle<T> {
    source: Pipeline<T>,
    current: TraversalIter<T>,
    yielded: bool,
}

impl<T: Clone + 'static> Iterator for Cycle<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.current.next() {
                self.yielded = true;
                return Some(item);
            }
            if !self.yielded {
                return None;
            }
            self.yielded = false;
            self.current = self.source.iter();
        }
    }
}

#[cfg(test)]
mod test {
    use std::cell::Cell;

    use super::*;
    use crate::{range, range_from};

    fn collect<T: Clone + 'static>(pipeline: &Pipeline<T>) -> Vec<T> {
        pipeline.iter().collect()
    }

    #[test]
    fn test_element_wise() {
        let numbers = range(1, 8);
        assert_eq!(vec![2, 4, 6], collect(&numbers.filter(|n| n % 2 == 0)));
        assert_eq!(None, numbers.filter(|n| n % 2 == 0).non_iterated_size());
        assert_eq!(vec![10, 30], collect(&numbers.filter_map(|n| (n % 2 == 1 && n < 5).then_some(n * 10))));
        assert_eq!(vec![1, 1, 2, 1, 2, 3], collect(&range(1, 4).flat_map(|n| 1..=n)));
        assert_eq!(vec![(0, 'a'), (1, 'b')], collect(&Pipeline::from_vec(vec!['a', 'b']).enumerate()));
        assert_eq!(vec![1, 2], collect(&numbers.take_while(|&n| n < 3)));
        assert_eq!(vec![6, 7], collect(&numbers.skip_while(|&n| n < 6)));
    }

    #[test]
    fn test_inspect_runs_per_traversal() {
        let seen = Rc::new(Cell::new(0));
        let counter = seen.clone();
        let pipeline = range(0, 3).inspect(move |_| counter.set(counter.get() + 1));
        assert_eq!(Some(3), pipeline.non_iterated_size());
        assert_eq!(0, seen.get());
        pipeline.iter().for_each(drop);
        pipeline.iter().for_each(drop);
        assert_eq!(6, seen.get());
    }

    #[test]
    fn test_step_by() {
        let stepped = range(0, 10).step_by(3).unwrap();
        assert_eq!(Some(4), stepped.non_iterated_size());
        assert_eq!(vec![0, 3, 6, 9], collect(&stepped));
        assert!(matches!(
            range(0, 10).step_by(0),
            Err(Error::InvalidArgument { name: "step", .. })
        ));
    }

    #[test]
    fn test_dedup_unique_scan() {
        let values = Pipeline::from_vec(vec![1, 1, 2, 3, 3, 1, 2]);
        assert_eq!(vec![1, 2, 3, 1, 2], collect(&values.dedup()));
        assert_eq!(vec![1, 2, 3], collect(&values.unique()));
        let running = values.scan(0, |total, n| {
            *total += n;
            (*total < 10).then_some(*total)
        });
        assert_eq!(vec![1, 2, 4, 7], collect(&running));
        assert_eq!(collect(&running), collect(&running));
    }

    #[test]
    fn test_repeat() {
        let repeated = range(1, 3).repeat(3);
        assert_eq!(Some(6), repeated.non_iterated_size());
        assert_eq!(vec![1, 2, 1, 2, 1, 2], collect(&repeated));
        let never = range(1, 3).repeat(0);
        assert_eq!(Some(0), never.non_iterated_size());
        assert_eq!(0, never.iter().count());
        assert!(range_from(0).repeat(2).is_unbounded());
        assert!(!range_from(0).repeat(0).is_unbounded());
    }

    #[test]
    fn test_cycle() {
        let cycled = range(1, 4).cycle();
        assert!(cycled.is_unbounded());
        assert_eq!(None, cycled.non_iterated_size());
        assert_eq!(vec![1, 2, 3, 1, 2, 3, 1], cycled.iter().take(7).collect::<Vec<_>>());
        assert!(!range(0, 0).cycle().is_unbounded());
        let runtime_empty = range(0, 3).filter(|_| false).cycle();
        assert!(runtime_empty.is_unbounded());
        assert_eq!(None, runtime_empty.iter().next());
    }
}
