//! [`Pipeline::map`], [`Pipeline::map_indexed`], and the rewrites a mapped pipeline applies to later slicing.

use std::rc::Rc;

use crate::pipeline::Variant;
use crate::{Pipeline, Result, Traversal};

/// Slicing operations a mapped pipeline may push below its mapping.
///
/// `None` means the rewrite does not apply and the caller should fall back to the general path.
pub(crate) trait MappedRewrite<T> {
    fn take(&self, n: usize) -> Pipeline<T>;
    fn skip(&self, n: usize) -> Pipeline<T>;
    fn skip_final(&self, n: usize) -> Result<Pipeline<T>>;
    fn take_final(&self, n: usize) -> Option<Result<Pipeline<T>>>;
    fn reverse(&self) -> Option<Result<Pipeline<T>>>;
}

/// Element `i` of the original is mapped with index `offset + i * step`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct IndexMap {
    offset: isize,
    step: isize,
}

impl IndexMap {
    const IDENTITY: Self = Self { offset: 0, step: 1 };

    fn at(self, i: usize) -> usize {
        (self.offset + i as isize * self.step) as usize
    }

    fn skip(self, n: usize) -> Self {
        Self {
            offset: self.offset + n as isize * self.step,
            ..self
        }
    }

    fn reverse(self, len: usize) -> Self {
        Self {
            offset: self.offset + (len as isize - 1) * self.step,
            step: -self.step,
        }
    }
}

struct MapState<U, T> {
    original: Pipeline<U>,
    func: Rc<dyn Fn(U, usize) -> T>,
    index: IndexMap,
    uses_index: bool,
}

impl<U: Clone + 'static, T: Clone + 'static> MapState<U, T> {
    /// The same mapping over a rewritten original.
    fn over(&self, original: Pipeline<U>, index: IndexMap) -> Pipeline<T> {
        Self {
            original,
            func: self.func.clone(),
            index,
            uses_index: self.uses_index,
        }
        .build()
    }

    fn build(self) -> Pipeline<T> {
        let flags = self.original.flags.lazy();
        let state = Rc::new(self);
        let producer = state.clone();
        let sized = state.clone();
        Pipeline::new(
            move || {
                let func = producer.func.clone();
                let index = producer.index;
                Traversal::cursor(
                    producer
                        .original
                        .iter()
                        .enumerate()
                        .map(move |(i, item)| func(item, index.at(i))),
                )
            },
            move || sized.original.non_iterated_size(),
            flags,
        )
        .with_variant(Variant::Mapped(state))
    }
}

impl<U: Clone + 'static, T: Clone + 'static> MappedRewrite<T> for MapState<U, T> {
    fn take(&self, n: usize) -> Pipeline<T> {
        tracing::trace!(n, "pushing take below map");
        self.over(self.original.take(n), self.index)
    }

    fn skip(&self, n: usize) -> Pipeline<T> {
        tracing::trace!(n, "pushing skip below map");
        self.over(self.original.skip(n), self.index.skip(n))
    }

    fn skip_final(&self, n: usize) -> Result<Pipeline<T>> {
        tracing::trace!(n, "pushing skip_final below map");
        Ok(self.over(self.original.skip_final(n)?, self.index))
    }

    fn take_final(&self, n: usize) -> Option<Result<Pipeline<T>>> {
        if self.uses_index {
            return None;
        }
        tracing::trace!(n, "pushing take_final below map");
        Some(
            self.original
                .take_final(n)
                .map(|original| self.over(original, self.index)),
        )
    }

    fn reverse(&self) -> Option<Result<Pipeline<T>>> {
        let index = if self.uses_index {
            let len = self.original.non_iterated_size()?;
            self.index.reverse(len)
        } else {
            self.index
        };
        tracing::trace!(uses_index = self.uses_index, "pushing reverse below map");
        Some(
            self.original
                .reverse()
                .map(|original| self.over(original, index)),
        )
    }
}

impl<T: Clone + 'static> Pipeline<T> {
    /// Lazily maps each element with `func`.
    ///
    /// `func` runs once per element in traversal order, during each traversal. Later [`take`](Self::take),
    /// [`skip`](Self::skip), [`take_final`](Self::take_final), [`skip_final`](Self::skip_final) and
    /// [`reverse`](Self::reverse) are applied before the mapping, so `func` never runs on elements that would be
    /// discarded.
    pub fn map<R: Clone + 'static>(&self, func: impl Fn(T) -> R + 'static) -> Pipeline<R> {
        MapState {
            original: self.clone(),
            func: Rc::new(move |item: T, _: usize| func(item)),
            index: IndexMap::IDENTITY,
            uses_index: false,
        }
        .build()
    }

    /// Lazily maps each element with `func`, which also receives the element's position.
    ///
    /// [`take`](Self::take), [`skip`](Self::skip) and [`skip_final`](Self::skip_final) are still applied before
    /// the mapping, with positions adjusted. [`reverse`](Self::reverse) is only applied first when the size is
    /// known.
    pub fn map_indexed<R: Clone + 'static>(
        &self,
        func: impl Fn(T, usize) -> R + 'static,
    ) -> Pipeline<R> {
        MapState {
            original: self.clone(),
            func: Rc::new(func),
            index: IndexMap::IDENTITY,
            uses_index: true,
        }
        .build()
    }
}
