//! Operations that copy a traversal into a new buffer they own: [`Pipeline::collect_fresh`],
//! [`Pipeline::shuffle`], and [`Pipeline::shuffle_with`].

use std::cell::RefCell;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::{Flags, Pipeline, Result, Traversal};

impl<T: Clone + 'static> Pipeline<T> {
    /// Copies each traversal into a new owned buffer.
    ///
    /// The result is fresh, so later [`take`](Self::take), [`skip`](Self::skip) and [`reverse`](Self::reverse)
    /// work on that buffer in place.
    ///
    /// Returns [`Error::Unbounded`](crate::Error::Unbounded) if `self` is unbounded.
    pub fn collect_fresh(&self) -> Result<Pipeline<T>> {
        self.ensure_bounded("collect_fresh")?;
        Ok(self.derive(Flags::MATERIALIZED, Self::non_iterated_size, |traversal| {
            Traversal::Owned(traversal.into_vec())
        }))
    }

    /// Shuffles each traversal uniformly, with a [`SmallRng`] seeded from the OS.
    ///
    /// Returns [`Error::Unbounded`](crate::Error::Unbounded) if `self` is unbounded.
    pub fn shuffle(&self) -> Result<Pipeline<T>> {
        self.ensure_bounded("shuffle")?;
        Ok(self.derive(Flags::MATERIALIZED, Self::non_iterated_size, |traversal| {
            let mut vec = traversal.into_vec();
            vec.shuffle(&mut SmallRng::from_entropy());
            Traversal::Owned(vec)
        }))
    }

    /// Shuffles each traversal with a Fisher-Yates pass driven by `random_int`.
    ///
    /// `random_int(upper)` must return an integer in `0..upper`. Larger values are reduced modulo `upper`.
    ///
    /// Returns [`Error::Unbounded`](crate::Error::Unbounded) if `self` is unbounded.
    pub fn shuffle_with(
        &self,
        random_int: impl FnMut(usize) -> usize + 'static,
    ) -> Result<Pipeline<T>> {
        self.ensure_bounded("shuffle")?;
        let random_int = RefCell::new(random_int);
        Ok(self.derive(Flags::MATERIALIZED, Self::non_iterated_size, move |traversal| {
            let mut vec = traversal.into_vec();
            let mut random_int = random_int.borrow_mut();
            for i in (1..vec.len()).rev() {
                let j = (*random_int)(i + 1) % (i + 1);
                vec.swap(i, j);
            }
            Traversal::Owned(vec)
        }))
    }
}
