//! [`Pipeline::windows`] and [`Pipeline::chunks`].

use seqstore::RingBuffer;

use crate::{Error, Pipeline, Result};

/// Sliding windows over `inner`, kept in a [`RingBuffer`] of the window size.
struct Windows<I: Iterator> {
    inner: I,
    ring: RingBuffer<I::Item>,
}

impl<I> Iterator for Windows<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = self.inner.next()?;
            self.ring.push(item);
            if self.ring.is_full() {
                return Some(self.ring.to_vec());
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let missing = self.ring.capacity() - self.ring.len();
        let remaining = |n: usize| n.saturating_sub(missing.saturating_sub(1));
        let (lo, hi) = self.inner.size_hint();
        (remaining(lo), hi.map(remaining))
    }
}

/// Consecutive chunks of `inner`, the last possibly short.
struct Chunks<I> {
    inner: I,
    size: usize,
}

impl<I: Iterator> Iterator for Chunks<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.inner.by_ref().take(self.size).collect::<Vec<_>>();
        (!chunk.is_empty()).then_some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo, hi) = self.inner.size_hint();
        (lo.div_ceil(self.size), hi.map(|hi| hi.div_ceil(self.size)))
    }
}

fn check_size(size: usize) -> Result<()> {
    if size == 0 {
        return Err(Error::InvalidArgument {
            name: "size",
            reason: "must be at least 1",
        });
    }
    Ok(())
}

impl<T: Clone + 'static> Pipeline<T> {
    /// Every run of `size` consecutive elements, in order.
    ///
    /// A sequence shorter than `size` has no windows. Returns [`Error::InvalidArgument`] if `size` is zero.
    pub fn windows(&self, size: usize) -> Result<Pipeline<Vec<T>>> {
        check_size(size)?;
        let template = RingBuffer::new(size)?;
        Ok(self.derive_iter(
            self.flags.lazy(),
            move |parent| parent.non_iterated_size().map(|len| (len + 1).saturating_sub(size)),
            move |inner| Windows {
                inner,
                ring: template.clone(),
            },
        ))
    }

    /// Consecutive chunks of `size` elements. The final chunk holds whatever remains.
    ///
    /// Returns [`Error::InvalidArgument`] if `size` is zero.
    pub fn chunks(&self, size: usize) -> Result<Pipeline<Vec<T>>> {
        check_size(size)?;
        Ok(self.derive_iter(
            self.flags.lazy(),
            move |parent| parent.non_iterated_size().map(|len| len.div_ceil(size)),
            move |inner| Chunks { inner, size },
        ))
    }
}
