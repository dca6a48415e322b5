//! [`Error`] type for the store structures.

/// Errors raised by [`RingBuffer`](crate::RingBuffer) and [`BoundedSortedSeq`](crate::BoundedSortedSeq).
///
/// Every error is reported before the structure is modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An argument was outside its accepted range.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        name: &'static str,
        /// What the argument must satisfy.
        reason: &'static str,
    },
    /// A batch reported one length but yielded a different number of elements.
    #[error("expected exactly {expected} elements, found {actual}")]
    SizeMismatch {
        /// The declared element count.
        expected: usize,
        /// The number of elements actually yielded.
        actual: usize,
    },
    /// A signed index did not address a live element.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// The requested logical index.
        index: isize,
        /// The number of live elements.
        len: usize,
    },
}

/// Result alias defaulting to [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;
