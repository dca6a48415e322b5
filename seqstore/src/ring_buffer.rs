//! [`RingBuffer`] and related items.

use std::fmt;
use std::iter::FusedIterator;
use std::ops::Range;

use crate::{Error, Result};

/// A fixed-capacity, double-ended circular buffer.
///
/// Logical index `i` (counted from the front) lives at physical slot `(offset + i) % capacity`. Pushing onto a full
/// buffer evicts from the opposite end: [`push`](Self::push) evicts the front element and
/// [`unshift`](Self::unshift) evicts the back element. Both run in `O(1)`.
///
/// Removed elements are dropped from their slots immediately, so the buffer never keeps a logically removed value
/// alive.
#[derive(Clone)]
pub struct RingBuffer<T> {
    /// Invariant: slots outside the live window are `None`.
    buf: Box<[Option<T>]>,
    offset: usize,
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Creates an empty buffer holding at most `capacity` elements.
    ///
    /// Returns [`Error::InvalidArgument`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidArgument {
                name: "capacity",
                reason: "must be at least 1",
            });
        }
        Ok(Self {
            buf: std::iter::repeat_with(|| None).take(capacity).collect(),
            offset: 0,
            len: 0,
        })
    }

    /// Creates a buffer of `capacity` and pushes every item of `iter`, keeping the final `capacity` of them.
    pub fn from_iter_with_capacity(capacity: usize, iter: impl IntoIterator<Item = T>) -> Result<Self> {
        let mut ring = Self::new(capacity)?;
        ring.extend(iter);
        Ok(ring)
    }

    /// The maximum number of elements.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// The number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there are no live elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the next push will evict an element.
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    fn physical(&self, logical: usize) -> usize {
        (self.offset + logical) % self.capacity()
    }

    /// Resolves a signed logical index (negative counts from the back) to a physical slot.
    fn slot(&self, index: isize) -> Option<usize> {
        let logical = if index < 0 {
            self.len.checked_sub(index.unsigned_abs())?
        } else {
            index.unsigned_abs()
        };
        (logical < self.len).then(|| self.physical(logical))
    }

    /// The (at most two) contiguous physical ranges covering logical positions `start..start + count`.
    ///
    /// Requires `start + count <= capacity`.
    fn physical_ranges(&self, start: usize, count: usize) -> (Range<usize>, Range<usize>) {
        debug_assert!(start + count <= self.capacity());
        let begin = self.physical(start);
        let head = count.min(self.capacity() - begin);
        (begin..begin + head, 0..count - head)
    }

    /// Sets every slot in the logical window `start..start + count` to `None`.
    fn drop_window(&mut self, start: usize, count: usize) {
        let (head, tail) = self.physical_ranges(start, count);
        self.buf[head].fill_with(|| None);
        self.buf[tail].fill_with(|| None);
    }

    /// Moves `items` into the logical window starting at `start`, which must already be vacant.
    fn write_window(&mut self, start: usize, items: Vec<T>) {
        let (head, tail) = self.physical_ranges(start, items.len());
        let mut items = items.into_iter();
        for (slot, item) in self.buf[head].iter_mut().zip(&mut items) {
            *slot = Some(item);
        }
        for (slot, item) in self.buf[tail].iter_mut().zip(items) {
            *slot = Some(item);
        }
    }

    /// Appends `value` at the back. If the buffer is full, the front element is evicted and returned.
    pub fn push(&mut self, value: T) -> Option<T> {
        if self.is_full() {
            let evicted = self.buf[self.offset].replace(value);
            self.offset = self.physical(1);
            evicted
        } else {
            let slot = self.physical(self.len);
            self.buf[slot] = Some(value);
            self.len += 1;
            None
        }
    }

    /// Prepends `value` at the front. If the buffer is full, the back element is evicted and returned.
    pub fn unshift(&mut self, value: T) -> Option<T> {
        let slot = self.physical(self.capacity() - 1);
        self.offset = slot;
        if self.len == self.capacity() {
            self.buf[slot].replace(value)
        } else {
            self.buf[slot] = Some(value);
            self.len += 1;
            None
        }
    }

    /// Removes and returns the back element.
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.len -= 1;
        let slot = self.physical(self.len);
        self.buf[slot].take()
    }

    /// Removes and returns the front element.
    pub fn shift(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let value = self.buf[self.offset].take();
        self.offset = self.physical(1);
        self.len -= 1;
        value
    }

    /// Returns the element at signed logical `index`; `-1` is the back element.
    pub fn get(&self, index: isize) -> Option<&T> {
        self.slot(index).and_then(|slot| self.buf[slot].as_ref())
    }

    /// Returns the element at signed logical `index` mutably.
    pub fn get_mut(&mut self, index: isize) -> Option<&mut T> {
        self.slot(index).and_then(|slot| self.buf[slot].as_mut())
    }

    /// Replaces the element at signed logical `index`, returning the previous one.
    pub fn set(&mut self, index: isize, value: T) -> Result<T> {
        let replaced = self
            .slot(index)
            .and_then(|slot| self.buf[slot].replace(value));
        replaced.ok_or(Error::IndexOutOfBounds {
            index,
            len: self.len,
        })
    }

    /// The front element.
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// The back element.
    pub fn back(&self) -> Option<&T> {
        self.get(-1)
    }

    /// Drops every live element and resets the buffer to empty.
    pub fn clear(&mut self) {
        self.drop_window(0, self.len);
        self.offset = 0;
        self.len = 0;
    }

    /// Reads `batch` fully, keeping at most `capacity` elements from its back (`from_back`) or front.
    ///
    /// Fails with [`Error::SizeMismatch`] if the batch yields a different count than it reported.
    fn stage<I>(&self, batch: I, from_back: bool) -> Result<Vec<T>>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let iter = batch.into_iter();
        let expected = iter.len();
        let keep = expected.min(self.capacity());
        if keep < expected {
            tracing::debug!(
                expected,
                capacity = self.capacity(),
                "Bulk batch exceeds capacity, dropping {} elements.",
                expected - keep,
            );
        }
        let skip = if from_back { expected - keep } else { 0 };

        let mut staged = Vec::with_capacity(keep);
        let mut actual = 0;
        for item in iter {
            if skip <= actual && staged.len() < keep {
                staged.push(item);
            }
            actual += 1;
        }
        if actual != expected {
            return Err(Error::SizeMismatch { expected, actual });
        }
        Ok(staged)
    }

    /// Appends every element of `batch` at the back, in order.
    ///
    /// Only the trailing `capacity` elements of an oversized batch survive, and existing front elements are evicted
    /// as needed. On [`Error::SizeMismatch`] the buffer is left unmodified.
    pub fn extend_back<I>(&mut self, batch: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let staged = self.stage(batch, true)?;
        let count = staged.len();
        let overflow = (self.len + count).saturating_sub(self.capacity());
        self.drop_window(0, overflow);
        self.offset = self.physical(overflow);
        self.len -= overflow;

        self.write_window(self.len, staged);
        self.len += count;
        Ok(())
    }

    /// Prepends every element of `batch` at the front, keeping the batch's order.
    ///
    /// Only the leading `capacity` elements of an oversized batch survive, and existing back elements are evicted as
    /// needed. On [`Error::SizeMismatch`] the buffer is left unmodified.
    pub fn extend_front<I>(&mut self, batch: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let staged = self.stage(batch, false)?;
        let count = staged.len();
        let overflow = (self.len + count).saturating_sub(self.capacity());
        self.drop_window(self.len - overflow, overflow);
        self.len -= overflow;

        self.offset = self.physical(self.capacity() - count);
        self.write_window(0, staged);
        self.len += count;
        Ok(())
    }

    /// Changes the capacity, keeping the final `min(len, new_capacity)` elements.
    pub fn resize(&mut self, new_capacity: usize) -> Result<()> {
        let mut resized = Self::new(new_capacity)?;
        let keep = self.len.min(new_capacity);
        let (head, tail) = self.physical_ranges(self.len - keep, keep);
        let mut kept = Vec::with_capacity(keep);
        for slot in head.chain(tail) {
            kept.extend(self.buf[slot].take());
        }
        resized.write_window(0, kept);
        resized.len = keep;
        *self = resized;
        Ok(())
    }

    /// Iterates front to back. The iterator is double-ended, so `.rev()` iterates back to front.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            ring: self,
            front: 0,
            back: self.len,
        }
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Clones the live elements into a `Vec`, front to back.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T> Extend<T> for RingBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for RingBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}
impl<T: Eq> Eq for RingBuffer<T> {}

/// Borrowing iterator over a [`RingBuffer`], see [`RingBuffer::iter`].
pub struct Iter<'a, T> {
    ring: &'a RingBuffer<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let slot = self.ring.physical(self.front);
        self.front += 1;
        self.ring.buf[slot].as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.ring.buf[self.ring.physical(self.back)].as_ref()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator over a [`RingBuffer`].
pub struct IntoIter<T> {
    ring: RingBuffer<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.ring.shift()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.ring.len, Some(self.ring.len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.ring.pop()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for RingBuffer<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { ring: self }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn contents<T: Clone>(ring: &RingBuffer<T>) -> Vec<T> {
        ring.to_vec()
    }

    #[test]
    fn test_zero_capacity() {
        assert_eq!(
            Err(Error::InvalidArgument {
                name: "capacity",
                reason: "must be at least 1"
            }),
            RingBuffer::<i32>::new(0).map(|_| ())
        );
    }

    #[test]
    fn test_push_evicts_front() {
        let mut ring = RingBuffer::new(3).unwrap();
        assert_eq!(None, ring.push(1));
        assert_eq!(None, ring.push(2));
        assert_eq!(None, ring.push(3));
        assert!(ring.is_full());
        assert_eq!(Some(1), ring.push(4));
        assert_eq!(vec![2, 3, 4], contents(&ring));

        assert_eq!(Some(4), ring.unshift(0));
        assert_eq!(vec![0, 2, 3], contents(&ring));
    }

    #[test]
    fn test_pop_shift() {
        let mut ring = RingBuffer::new(4).unwrap();
        ring.extend([1, 2, 3, 4, 5]);
        assert_eq!(Some(5), ring.pop());
        assert_eq!(Some(2), ring.shift());
        assert_eq!(vec![3, 4], contents(&ring));
        assert_eq!(Some(4), ring.pop());
        assert_eq!(Some(3), ring.pop());
        assert_eq!(None, ring.pop());
        assert_eq!(None, ring.shift());
        assert!(ring.is_empty());

        ring.unshift(9);
        assert_eq!(Some(&9), ring.front());
        assert_eq!(Some(&9), ring.back());
    }

    #[test]
    fn test_signed_index() {
        let mut ring = RingBuffer::new(3).unwrap();
        ring.extend([1, 2, 3, 4]);
        assert_eq!(Some(&2), ring.get(0));
        assert_eq!(Some(&4), ring.get(2));
        assert_eq!(None, ring.get(3));
        assert_eq!(Some(&4), ring.get(-1));
        assert_eq!(Some(&2), ring.get(-3));
        assert_eq!(None, ring.get(-4));

        assert_eq!(Ok(3), ring.set(-2, 30));
        *ring.get_mut(0).unwrap() += 20;
        assert_eq!(vec![22, 30, 4], contents(&ring));
        assert_eq!(
            Err(Error::IndexOutOfBounds { index: 5, len: 3 }),
            ring.set(5, 0)
        );
    }

    #[test]
    fn test_extend_back_split() {
        let mut ring = RingBuffer::new(5).unwrap();
        ring.extend([1, 2, 3, 4]);
        ring.shift();
        ring.shift();
        // Live window is physical 2..4, appending wraps around the end.
        ring.extend_back([5, 6, 7]).unwrap();
        assert_eq!(vec![3, 4, 5, 6, 7], contents(&ring));

        ring.extend_back([8, 9]).unwrap();
        assert_eq!(vec![5, 6, 7, 8, 9], contents(&ring));
    }

    #[test]
    fn test_extend_back_oversized() {
        let mut ring = RingBuffer::new(3).unwrap();
        ring.push(0);
        ring.extend_back(1..8).unwrap();
        assert_eq!(vec![5, 6, 7], contents(&ring));
        assert_eq!(3, ring.len());
    }

    #[test]
    fn test_extend_front() {
        let mut ring = RingBuffer::new(5).unwrap();
        ring.extend([4, 5]);
        ring.extend_front([1, 2, 3]).unwrap();
        assert_eq!(vec![1, 2, 3, 4, 5], contents(&ring));

        ring.extend_front([-1, 0]).unwrap();
        assert_eq!(vec![-1, 0, 1, 2, 3], contents(&ring));

        ring.extend_front(10..20).unwrap();
        assert_eq!(vec![10, 11, 12, 13, 14], contents(&ring));
    }

    #[test]
    fn test_size_mismatch_leaves_buffer() {
        struct Liar(std::ops::Range<i32>);
        impl Iterator for Liar {
            type Item = i32;
            fn next(&mut self) -> Option<i32> {
                self.0.next()
            }
            fn size_hint(&self) -> (usize, Option<usize>) {
                (10, Some(10))
            }
        }
        impl ExactSizeIterator for Liar {}

        let mut ring = RingBuffer::new(4).unwrap();
        ring.extend([1, 2]);
        assert_eq!(
            Err(Error::SizeMismatch {
                expected: 10,
                actual: 3
            }),
            ring.extend_back(Liar(0..3))
        );
        assert_eq!(vec![1, 2], contents(&ring));
    }

    #[test]
    fn test_resize() {
        let mut ring = RingBuffer::new(4).unwrap();
        ring.extend([1, 2, 3, 4, 5, 6]);
        ring.resize(2).unwrap();
        assert_eq!(vec![5, 6], contents(&ring));
        assert_eq!(2, ring.capacity());

        ring.resize(4).unwrap();
        ring.push(7);
        ring.unshift(4);
        assert_eq!(vec![4, 5, 6, 7], contents(&ring));
        assert!(ring.resize(0).is_err());
    }

    #[test]
    fn test_clear_drops_elements() {
        use std::rc::Rc;

        let tracked = Rc::new(());
        let mut ring = RingBuffer::new(2).unwrap();
        ring.push(tracked.clone());
        ring.push(tracked.clone());
        assert_eq!(3, Rc::strong_count(&tracked));
        ring.clear();
        assert_eq!(1, Rc::strong_count(&tracked));
        assert!(ring.is_empty());

        ring.push(tracked.clone());
        ring.shift();
        assert_eq!(1, Rc::strong_count(&tracked));
    }

    #[test]
    fn test_iter_rev() {
        let mut ring = RingBuffer::new(3).unwrap();
        ring.extend([1, 2, 3, 4, 5]);
        assert_eq!(vec![5, 4, 3], ring.iter().rev().copied().collect::<Vec<_>>());
        assert_eq!(3, ring.iter().len());
        assert_eq!(vec![5, 4, 3], ring.clone().into_iter().rev().collect::<Vec<_>>());
        assert_eq!("[3, 4, 5]", format!("{:?}", ring));
    }
}
