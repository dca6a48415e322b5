//! Positional slicing: [`Pipeline::take`], [`Pipeline::skip`], [`Pipeline::take_final`],
//! [`Pipeline::skip_final`], and [`Pipeline::reverse`].

use seqstore::{Keep, RingBuffer};

use crate::pipeline::Variant;
use crate::{Pipeline, Result, Traversal};

/// Yields the final `capacity` elements of `inner` once it is exhausted.
struct TakeFinal<I: Iterator> {
    inner: Option<I>,
    ring: RingBuffer<I::Item>,
}

impl<I: Iterator> Iterator for TakeFinal<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(inner) = self.inner.take() {
            self.ring.extend(inner);
        }
        self.ring.shift()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            Some(inner) => {
                let capacity = self.ring.capacity();
                let (lo, hi) = inner.size_hint();
                (
                    lo.min(capacity),
                    Some(hi.map_or(capacity, |hi| hi.min(capacity))),
                )
            }
            None => (self.ring.len(), Some(self.ring.len())),
        }
    }
}

/// Yields each element of `inner` once `capacity` newer elements have been seen, dropping the final `capacity`.
struct SkipFinal<I: Iterator> {
    inner: I,
    ring: RingBuffer<I::Item>,
}

impl<I: Iterator> Iterator for SkipFinal<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = self.inner.next()?;
            if let Some(evicted) = self.ring.push(item) {
                return Some(evicted);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pending = self.ring.capacity() - self.ring.len();
        let (lo, hi) = self.inner.size_hint();
        (
            lo.saturating_sub(pending),
            hi.map(|hi| hi.saturating_sub(pending)),
        )
    }
}

impl<T: Clone + 'static> Pipeline<T> {
    /// Keeps at most the first `n` elements.
    ///
    /// The result is bounded even if `self` is not. A fresh buffer is truncated in place, a sort keeps only its `n`
    /// least elements, and a mapping is applied after the cut.
    pub fn take(&self, n: usize) -> Pipeline<T> {
        if let Some(len) = self.non_iterated_size()
            && len <= n
        {
            tracing::trace!(len, n, "take covers the whole pipeline");
            return self.clone();
        }
        match &self.variant {
            Variant::Sorted(sorted) => return sorted.bounded(n, Keep::Least),
            Variant::Mapped(mapped) => return mapped.take(n),
            Variant::Plain => {}
        }
        let flags = if self.flags.fresh_output {
            self.flags.with_unbounded(false)
        } else {
            self.flags.lazy_bounded()
        };
        self.derive(
            flags,
            move |parent| parent.non_iterated_size().map(|len| len.min(n)),
            move |traversal| traversal.take(n),
        )
    }

    /// Drops the first `n` elements.
    ///
    /// A fresh buffer is drained in place, and a mapping is applied after the cut.
    pub fn skip(&self, n: usize) -> Pipeline<T> {
        if n == 0 {
            return self.clone();
        }
        if let Variant::Mapped(mapped) = &self.variant {
            return mapped.skip(n);
        }
        let flags = if self.flags.fresh_output {
            self.flags
        } else {
            self.flags.lazy()
        };
        self.derive(
            flags,
            move |parent| parent.non_iterated_size().map(|len| len.saturating_sub(n)),
            move |traversal| traversal.skip(n),
        )
    }

    /// Keeps the final `n` elements.
    ///
    /// If the size is known when a traversal starts, this is a [`skip`](Self::skip) of the excess. Otherwise the
    /// source is traversed once through a [`RingBuffer`] of capacity `n`. A sort keeps only its `n` greatest
    /// elements instead.
    ///
    /// Returns [`Error::Unbounded`](crate::Error::Unbounded) if `self` is unbounded.
    pub fn take_final(&self, n: usize) -> Result<Pipeline<T>> {
        self.ensure_bounded("take_final")?;
        match &self.variant {
            Variant::Sorted(sorted) => return Ok(sorted.bounded(n, Keep::Greatest)),
            Variant::Mapped(mapped) => {
                if let Some(rewritten) = mapped.take_final(n) {
                    return rewritten;
                }
            }
            Variant::Plain => {}
        }
        let parent = self.clone();
        let sized = self.clone();
        Ok(Pipeline::new(
            move || parent.take_final_traversal(n),
            move || sized.non_iterated_size().map(|len| len.min(n)),
            self.flags.lazy_bounded(),
        ))
    }

    fn take_final_traversal(&self, n: usize) -> Traversal<T> {
        if let Some(len) = self.non_iterated_size() {
            tracing::trace!(len, n, "take_final answered by skip");
            return self.skip(len.saturating_sub(n)).traverse();
        }
        let Ok(ring) = RingBuffer::new(n) else {
            return Traversal::Owned(Vec::new());
        };
        Traversal::cursor(TakeFinal {
            inner: Some(self.iter()),
            ring,
        })
    }

    /// Drops the final `n` elements.
    ///
    /// If the size is known when a traversal starts, this is a [`take`](Self::take) of the rest. Otherwise each
    /// element is yielded once `n` newer elements have been seen, using a [`RingBuffer`] of capacity `n`.
    ///
    /// Returns [`Error::Unbounded`](crate::Error::Unbounded) if `self` is unbounded.
    pub fn skip_final(&self, n: usize) -> Result<Pipeline<T>> {
        self.ensure_bounded("skip_final")?;
        if n == 0 {
            return Ok(self.clone());
        }
        if let Variant::Mapped(mapped) = &self.variant {
            return mapped.skip_final(n);
        }
        let parent = self.clone();
        let sized = self.clone();
        Ok(Pipeline::new(
            move || parent.skip_final_traversal(n),
            move || sized.non_iterated_size().map(|len| len.saturating_sub(n)),
            self.flags.lazy_bounded(),
        ))
    }

    fn skip_final_traversal(&self, n: usize) -> Traversal<T> {
        if let Some(len) = self.non_iterated_size() {
            tracing::trace!(len, n, "skip_final answered by take");
            return self.take(len.saturating_sub(n)).traverse();
        }
        let Ok(ring) = RingBuffer::new(n) else {
            return self.traverse();
        };
        Traversal::cursor(SkipFinal {
            inner: self.iter(),
            ring,
        })
    }

    /// Reverses the order.
    ///
    /// A fresh buffer is reversed in place and a shared one is read backwards. Anything else is buffered.
    ///
    /// Returns [`Error::Unbounded`](crate::Error::Unbounded) if `self` is unbounded.
    pub fn reverse(&self) -> Result<Pipeline<T>> {
        self.ensure_bounded("reverse")?;
        if let Variant::Mapped(mapped) = &self.variant
            && let Some(rewritten) = mapped.reverse()
        {
            return rewritten;
        }
        let flags = if self.flags.fresh_output {
            self.flags
        } else {
            self.flags.lazy()
        };
        Ok(self.derive(
            flags,
            |parent| parent.non_iterated_size(),
            Traversal::reverse,
        ))
    }
}
