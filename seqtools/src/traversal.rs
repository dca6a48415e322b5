//! [`Traversal`], one production of a pipeline's elements, and [`TraversalIter`].

use std::fmt;
use std::ops::Range;
use std::rc::Rc;

/// One production of a pipeline's elements.
///
/// The layout decides which operations are cheap: an [`Owned`](Self::Owned) buffer is truncated and reversed in
/// place, a [`Shared`](Self::Shared) window is narrowed in `O(1)`, and a [`Cursor`](Self::Cursor) can only be
/// wrapped.
pub enum Traversal<T> {
    /// A freshly allocated buffer owned by the consumer, which may mutate it.
    Owned(Vec<T>),
    /// A window into shared random-access storage. Elements are cloned out as they are read.
    Shared {
        /// The backing storage.
        data: Rc<[T]>,
        /// The live window of `data`. Always within bounds.
        range: Range<usize>,
    },
    /// A one-pass cursor.
    Cursor(Box<dyn Iterator<Item = T>>),
}

impl<T: Clone + 'static> Traversal<T> {
    /// Wraps an iterator.
    pub fn cursor(iter: impl Iterator<Item = T> + 'static) -> Self {
        Self::Cursor(Box::new(iter))
    }

    /// A window over all of `data`.
    pub fn shared(data: Rc<[T]>) -> Self {
        let range = 0..data.len();
        Self::Shared { data, range }
    }

    /// The number of remaining elements, if known without advancing.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Owned(vec) => Some(vec.len()),
            Self::Shared { range, .. } => Some(range.len()),
            Self::Cursor(iter) => match iter.size_hint() {
                (lo, Some(hi)) if lo == hi => Some(lo),
                _ => None,
            },
        }
    }

    /// Returns `true` if the traversal is known to yield nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Keeps at most the first `n` elements.
    pub fn take(self, n: usize) -> Self {
        match self {
            Self::Owned(mut vec) => {
                if n < vec.len() {
                    tracing::trace!(len = vec.len(), n, "truncating fresh buffer in place");
                    vec.truncate(n);
                }
                Self::Owned(vec)
            }
            Self::Shared { data, range } => {
                let end = range.start + n.min(range.len());
                Self::Shared {
                    data,
                    range: range.start..end,
                }
            }
            Self::Cursor(iter) => Self::cursor(iter.take(n)),
        }
    }

    /// Drops the first `n` elements.
    pub fn skip(self, n: usize) -> Self {
        match self {
            Self::Owned(mut vec) => {
                let n = n.min(vec.len());
                if 0 < n {
                    tracing::trace!(len = vec.len(), n, "draining fresh buffer in place");
                    vec.drain(..n);
                }
                Self::Owned(vec)
            }
            Self::Shared { data, range } => {
                let start = range.start + n.min(range.len());
                Self::Shared {
                    data,
                    range: start..range.end,
                }
            }
            Self::Cursor(iter) => Self::cursor(iter.skip(n)),
        }
    }

    /// Reverses the order. A cursor is buffered first.
    pub fn reverse(self) -> Self {
        match self {
            Self::Owned(mut vec) => {
                vec.reverse();
                Self::Owned(vec)
            }
            Self::Shared { data, range } => Self::cursor(range.rev().map(move |i| data[i].clone())),
            Self::Cursor(iter) => {
                let mut vec = iter.collect::<Vec<_>>();
                vec.reverse();
                Self::Owned(vec)
            }
        }
    }

    /// Counts the elements, consuming a cursor only if its size is unknown.
    pub fn count(self) -> usize {
        match self.len() {
            Some(len) => len,
            None => self.into_iter().count(),
        }
    }

    /// Collects into a `Vec`, reusing an owned buffer.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Owned(vec) => vec,
            Self::Shared { data, range } => data[range].to_vec(),
            Self::Cursor(iter) => iter.collect(),
        }
    }
}

impl<T> fmt::Debug for Traversal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owned(vec) => f.debug_tuple("Owned").field(&vec.len()).finish(),
            Self::Shared { range, .. } => f.debug_struct("Shared").field("range", range).finish_non_exhaustive(),
            Self::Cursor(iter) => f.debug_tuple("Cursor").field(&iter.size_hint()).finish(),
        }
    }
}

impl<T: Clone> IntoIterator for Traversal<T> {
    type Item = T;
    type IntoIter = TraversalIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let inner = match self {
            Self::Owned(vec) => IterInner::Owned(vec.into_iter()),
            Self::Shared { data, range } => IterInner::Shared { data, range },
            Self::Cursor(iter) => IterInner::Cursor(iter),
        };
        TraversalIter { inner }
    }
}

enum IterInner<T> {
    Owned(std::vec::IntoIter<T>),
    Shared { data: Rc<[T]>, range: Range<usize> },
    Cursor(Box<dyn Iterator<Item = T>>),
}

/// Iterator over a [`Traversal`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct TraversalIter<T> {
    inner: IterInner<T>,
}

impl<T: Clone> Iterator for TraversalIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Owned(iter) => iter.next(),
            IterInner::Shared { data, range } => range.next().map(|i| data[i].clone()),
            IterInner::Cursor(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IterInner::Owned(iter) => iter.size_hint(),
            IterInner::Shared { range, .. } => range.size_hint(),
            IterInner::Cursor(iter) => iter.size_hint(),
        }
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Owned(iter) => iter.nth(n),
            IterInner::Shared { data, range } => range.nth(n).map(|i| data[i].clone()),
            IterInner::Cursor(iter) => iter.nth(n),
        }
    }
}
