//! Pipeline sources.

use std::cell::RefCell;
use std::ops::{Range, RangeFrom};
use std::rc::Rc;

use sealed::sealed;
use seqstore::{BoundedSortedSeq, RingBuffer};

use crate::{Error, Flags, Pipeline, Result, SortedPipeline, Traversal};

/// Returns the length of `iter` if its size hint is exact.
pub(crate) fn exact_len(iter: &impl Iterator) -> Option<usize> {
    match iter.size_hint() {
        (lo, Some(hi)) if lo == hi => Some(lo),
        _ => None,
    }
}

/// Values that can become a [`Pipeline`] without running user code.
#[sealed]
pub trait IntoPipeline<T> {
    /// Converts into a pipeline.
    fn into_pipeline(self) -> Pipeline<T>;
}

#[sealed]
impl<T: Clone + 'static> IntoPipeline<T> for Vec<T> {
    fn into_pipeline(self) -> Pipeline<T> {
        Pipeline::from_vec(self)
    }
}

#[sealed]
impl<T: Clone + 'static> IntoPipeline<T> for RingBuffer<T> {
    /// Snapshots the buffer front to back.
    fn into_pipeline(self) -> Pipeline<T> {
        Pipeline::from_vec(self.into_iter().collect())
    }
}

#[sealed]
impl<T: Clone + 'static> IntoPipeline<T> for BoundedSortedSeq<T> {
    /// Snapshots the sequence in ascending order.
    fn into_pipeline(self) -> Pipeline<T> {
        Pipeline::from_vec(self.into_vec())
    }
}

#[sealed]
impl<T> IntoPipeline<T> for Pipeline<T> {
    fn into_pipeline(self) -> Pipeline<T> {
        self
    }
}

#[sealed]
impl<T: Clone + 'static> IntoPipeline<T> for SortedPipeline<T> {
    fn into_pipeline(self) -> Pipeline<T> {
        SortedPipeline::into_pipeline(self)
    }
}

impl<T: Clone + 'static> Pipeline<T> {
    /// A pipeline over `vec`, shared by every traversal.
    ///
    /// The size is always known, and slicing narrows a window without copying.
    pub fn from_vec(vec: Vec<T>) -> Self {
        let data: Rc<[T]> = vec.into();
        let len = data.len();
        Self::new(
            move || Traversal::shared(data.clone()),
            move || Some(len),
            Flags::default(),
        )
    }

    /// A pipeline over a copy of `slice`.
    pub fn from_slice(slice: &[T]) -> Self {
        Self::from_vec(slice.to_vec())
    }

    /// A pipeline over a collection or another pipeline.
    pub fn from_source(source: impl IntoPipeline<T>) -> Self {
        source.into_pipeline()
    }

    /// A pipeline that calls `func` for each traversal.
    ///
    /// Calling an arbitrary function is assumed to be expensive, so the size is never probed. Use
    /// [`Self::from_fn_with`] to declare otherwise.
    pub fn from_fn<I>(func: impl Fn() -> I + 'static) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::from_fn_with(func, Flags::default().with_expensive_produce(true))
    }

    /// A pipeline that calls `func` for each traversal, described by `flags`.
    ///
    /// If `flags.expensive_produce` and `flags.unbounded` are both unset, the size is probed by calling `func` and
    /// reading an exact size hint. If `flags.fresh_output` is set, each result is collected into an owned buffer.
    pub fn from_fn_with<I>(func: impl Fn() -> I + 'static, flags: Flags) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        let func = Rc::new(func);
        let probe = func.clone();
        Self::new(
            move || {
                let iter = func().into_iter();
                if flags.fresh_output {
                    Traversal::Owned(iter.collect())
                } else {
                    Traversal::cursor(iter)
                }
            },
            move || {
                if flags.expensive_produce {
                    return None;
                }
                exact_len(&probe().into_iter())
            },
            flags,
        )
    }

    /// A pipeline over a one-shot iterator.
    ///
    /// The first traversal consumes `iter`; every later traversal is empty.
    pub fn from_iter_once(iter: impl IntoIterator<Item = T, IntoIter: 'static>) -> Self {
        let cell = Rc::new(RefCell::new(Some(iter.into_iter())));
        Self::new(
            move || match cell.borrow_mut().take() {
                Some(iter) => Traversal::cursor(iter),
                None => Traversal::Owned(Vec::new()),
            },
            || None,
            Flags::default(),
        )
    }
}

impl<T: Clone + 'static> From<Vec<T>> for Pipeline<T> {
    fn from(vec: Vec<T>) -> Self {
        Self::from_vec(vec)
    }
}

impl<T: Clone + 'static> FromIterator<T> for Pipeline<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

/// An empty pipeline.
pub fn empty<T: Clone + 'static>() -> Pipeline<T> {
    Pipeline::from_vec(Vec::new())
}

/// A pipeline of the single element `value`.
pub fn once<T: Clone + 'static>(value: T) -> Pipeline<T> {
    Pipeline::from_vec(vec![value])
}

/// The half-open range `start..end`.
pub fn range<N>(start: N, end: N) -> Pipeline<N>
where
    N: Clone + 'static,
    Range<N>: Iterator<Item = N>,
{
    let bounds = start..end;
    let probe = bounds.clone();
    Pipeline::new(
        move || Traversal::cursor(bounds.clone()),
        move || exact_len(&probe.clone()),
        Flags::default(),
    )
}

/// `start, start + step, ...` up to but excluding `end`. A negative `step` counts down.
///
/// Returns [`Error::InvalidArgument`] if `step` is zero.
pub fn range_step(start: i64, end: i64, step: i64) -> Result<Pipeline<i64>> {
    if step == 0 {
        return Err(Error::InvalidArgument {
            name: "step",
            reason: "must not be zero",
        });
    }
    let span = if 0 < step {
        i128::from(end) - i128::from(start)
    } else {
        i128::from(start) - i128::from(end)
    };
    let step_abs = i128::from(step).abs();
    let len = if span <= 0 {
        0
    } else {
        usize::try_from((span + step_abs - 1) / step_abs).unwrap_or(usize::MAX)
    };
    Ok(Pipeline::new(
        move || {
            Traversal::cursor(
                std::iter::successors(Some(start), move |&n| n.checked_add(step)).take(len),
            )
        },
        move || Some(len),
        Flags::default(),
    ))
}

/// `start, start + 1, ...` without end.
pub fn range_from<N>(start: N) -> Pipeline<N>
where
    N: Clone + 'static,
    RangeFrom<N>: Iterator<Item = N>,
{
    Pipeline::new(
        move || Traversal::cursor(start.clone()..),
        || None,
        Flags::default().with_unbounded(true),
    )
}

/// `value` repeated `n` times.
pub fn repeat_value<T: Clone + 'static>(value: T, n: usize) -> Pipeline<T> {
    Pipeline::new(
        move || Traversal::cursor(itertools::repeat_n(value.clone(), n)),
        move || Some(n),
        Flags::default(),
    )
}

/// `value` repeated without end.
pub fn repeat_forever<T: Clone + 'static>(value: T) -> Pipeline<T> {
    Pipeline::new(
        move || Traversal::cursor(std::iter::repeat(value.clone())),
        || None,
        Flags::default().with_unbounded(true),
    )
}

/// `func(0), func(1), ...` without end.
pub fn generate<T: Clone + 'static>(func: impl Fn(usize) -> T + 'static) -> Pipeline<T> {
    let func = Rc::new(func);
    Pipeline::new(
        move || {
            let func = func.clone();
            Traversal::cursor((0..).map(move |i| func(i)))
        },
        || None,
        Flags::default().with_unbounded(true),
    )
}

/// `func(0), func(1), ..., func(n - 1)`.
pub fn generate_n<T: Clone + 'static>(n: usize, func: impl Fn(usize) -> T + 'static) -> Pipeline<T> {
    let func = Rc::new(func);
    Pipeline::new(
        move || {
            let func = func.clone();
            Traversal::cursor((0..n).map(move |i| func(i)))
        },
        move || Some(n),
        Flags::default(),
    )
}
