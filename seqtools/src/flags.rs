//! [`Flags`], the declarative metadata carried by every pipeline.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Declarative facts about a pipeline's producer, used to pick cheaper evaluation strategies.
///
/// The flags never change what a pipeline yields, only how much work is done to yield it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Flags {
    /// Each production is a new, exclusively owned buffer that may be consumed destructively.
    pub fresh_output: bool,
    /// Invoking the producer costs more than `O(1)`, so it is never invoked just to learn the size.
    pub expensive_produce: bool,
    /// Traversal may never terminate; operations that must finish traversing are refused.
    pub unbounded: bool,
}

impl Flags {
    /// Flags of a pipeline that allocates and owns a new buffer on every production.
    pub const MATERIALIZED: Self = Self {
        fresh_output: true,
        expensive_produce: true,
        unbounded: false,
    };

    /// Sets [`Self::fresh_output`].
    pub const fn with_fresh_output(self, fresh_output: bool) -> Self {
        Self {
            fresh_output,
            ..self
        }
    }

    /// Sets [`Self::expensive_produce`].
    pub const fn with_expensive_produce(self, expensive_produce: bool) -> Self {
        Self {
            expensive_produce,
            ..self
        }
    }

    /// Sets [`Self::unbounded`].
    pub const fn with_unbounded(self, unbounded: bool) -> Self {
        Self { unbounded, ..self }
    }

    /// Flags for a lazy wrapper over a producer with these flags.
    pub(crate) const fn lazy(self) -> Self {
        self.with_fresh_output(false)
    }

    /// Flags for a lazy wrapper that bounds its output.
    pub(crate) const fn lazy_bounded(self) -> Self {
        self.lazy().with_unbounded(false)
    }

    /// Flags for a lazy combination of two producers.
    pub(crate) const fn lazy_union(self, other: Self) -> Self {
        Self {
            fresh_output: false,
            expensive_produce: self.expensive_produce || other.expensive_produce,
            unbounded: self.unbounded || other.unbounded,
        }
    }
}
