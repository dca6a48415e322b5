//! [`Pipeline`], a deferred and replayable sequence.

use std::fmt;
use std::rc::Rc;

use crate::map::MappedRewrite;
use crate::sort::SortState;
use crate::{Error, Flags, Result, Traversal, TraversalIter};

pub(crate) type Produce<T> = Rc<dyn Fn() -> Traversal<T>>;
pub(crate) type SizeProbe = Rc<dyn Fn() -> Option<usize>>;

/// A deferred, replayable description of a sequence.
///
/// A pipeline holds a producer, which yields one fresh [`Traversal`] each time it is invoked, and [`Flags`]
/// describing that producer. Building a pipeline never traverses anything: each combinator returns a new pipeline
/// referencing the previous one, and elements are only produced when a terminal operation such as
/// [`to_vec`](Self::to_vec) or [`count`](Self::count) pulls them. Every terminal call starts a new, independent
/// traversal.
///
/// Cloning is cheap; clones share the same producer.
///
/// Pipelines over mappings and sorts remember how they were built, so that later slicing operations can be
/// rewritten into cheaper equivalents before anything is traversed. See [`map`](Self::map) and
/// [`sort`](Self::sort).
#[must_use = "pipelines are lazy and do nothing unless consumed"]
pub struct Pipeline<T> {
    pub(crate) produce: Produce<T>,
    pub(crate) size: SizeProbe,
    pub(crate) flags: Flags,
    pub(crate) variant: Variant<T>,
}

/// The closed set of pipeline specializations.
pub(crate) enum Variant<T> {
    Plain,
    /// Output of a mapping, which can push slicing below itself.
    Mapped(Rc<dyn MappedRewrite<T>>),
    /// Output of a sort, which can answer bounded requests without a full sort.
    Sorted(Rc<SortState<T>>),
}

impl<T> Clone for Variant<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Plain => Self::Plain,
            Self::Mapped(mapped) => Self::Mapped(mapped.clone()),
            Self::Sorted(sorted) => Self::Sorted(sorted.clone()),
        }
    }
}

impl<T> Clone for Pipeline<T> {
    fn clone(&self) -> Self {
        Self {
            produce: self.produce.clone(),
            size: self.size.clone(),
            flags: self.flags,
            variant: self.variant.clone(),
        }
    }
}

impl<T: Clone + 'static> Pipeline<T> {
    /// Creates a plain pipeline from its parts.
    ///
    /// `size` must answer without invoking `produce` unless `flags` allow it.
    pub(crate) fn new(
        produce: impl Fn() -> Traversal<T> + 'static,
        size: impl Fn() -> Option<usize> + 'static,
        flags: Flags,
    ) -> Self {
        Self {
            produce: Rc::new(produce),
            size: Rc::new(size),
            flags,
            variant: Variant::Plain,
        }
    }

    pub(crate) fn with_variant(self, variant: Variant<T>) -> Self {
        Self { variant, ..self }
    }

    /// Derives a pipeline whose every traversal is `transform` applied to a traversal of `self`.
    pub(crate) fn derive<R: Clone + 'static>(
        &self,
        flags: Flags,
        size: impl Fn(&Self) -> Option<usize> + 'static,
        transform: impl Fn(Traversal<T>) -> Traversal<R> + 'static,
    ) -> Pipeline<R> {
        let parent = self.clone();
        let sized = self.clone();
        Pipeline::new(
            move || transform(parent.traverse()),
            move || size(&sized),
            flags,
        )
    }

    /// Like [`Self::derive`], wrapping each traversal's iterator.
    pub(crate) fn derive_iter<R, I>(
        &self,
        flags: Flags,
        size: impl Fn(&Self) -> Option<usize> + 'static,
        transform: impl Fn(TraversalIter<T>) -> I + 'static,
    ) -> Pipeline<R>
    where
        R: Clone + 'static,
        I: Iterator<Item = R> + 'static,
    {
        self.derive(flags, size, move |traversal| {
            Traversal::cursor(transform(traversal.into_iter()))
        })
    }

    /// Invokes the producer, starting a new traversal.
    pub fn traverse(&self) -> Traversal<T> {
        (self.produce)()
    }

    /// Starts a new traversal as an iterator.
    ///
    /// Allowed on unbounded pipelines; the caller decides when to stop.
    pub fn iter(&self) -> TraversalIter<T> {
        self.traverse().into_iter()
    }

    /// The pipeline's [`Flags`].
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Returns `true` if traversal is known to never terminate.
    pub fn is_unbounded(&self) -> bool {
        self.flags.unbounded
    }

    /// The number of elements, if it is known without traversing.
    ///
    /// Never invokes an expensive producer, and always `None` for an unbounded pipeline.
    pub fn non_iterated_size(&self) -> Option<usize> {
        if self.flags.unbounded {
            return None;
        }
        (self.size)()
    }

    /// Fails with [`Error::Unbounded`] if the pipeline is unbounded.
    pub(crate) fn ensure_bounded(&self, operation: &'static str) -> Result<()> {
        if self.flags.unbounded {
            tracing::debug!(operation, "rejecting operation on an unbounded pipeline");
            return Err(Error::Unbounded { operation });
        }
        Ok(())
    }
}

impl<T> fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self.variant {
            Variant::Plain => "plain",
            Variant::Mapped(_) => "mapped",
            Variant::Sorted(_) => "sorted",
        };
        f.debug_struct("Pipeline")
            .field("flags", &self.flags)
            .field("variant", &variant)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + 'static> IntoIterator for &Pipeline<T> {
    type Item = T;
    type IntoIter = TraversalIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
