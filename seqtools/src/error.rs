//! [`Error`] type for pipeline operations.

/// Errors raised by [`Pipeline`](crate::Pipeline) operations.
///
/// Errors are reported before any traversal starts; a failing call never invokes a producer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Error from a backing [`seqstore`] structure.
    #[error(transparent)]
    Store(#[from] seqstore::Error),
    /// An argument was outside its accepted range.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        name: &'static str,
        /// What the argument must satisfy.
        reason: &'static str,
    },
    /// An operation that must finish traversing was called on an unbounded pipeline.
    #[error("`{operation}` requires a bounded sequence, but the pipeline is unbounded")]
    Unbounded {
        /// The rejected operation.
        operation: &'static str,
    },
    /// A fixed-size consumer found a different number of elements.
    #[error("expected exactly {expected} elements, found {actual}")]
    SizeMismatch {
        /// The required element count.
        expected: usize,
        /// The number of elements found.
        actual: usize,
    },
}

/// Result alias defaulting to [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;
