#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

pub use itertools::EitherOrBoth;
pub use seqstore;

mod adaptors;
mod combine;
pub mod error;
pub mod flags;
mod map;
mod materialize;
pub mod pipeline;
mod slice;
pub mod sort;
pub mod source;
mod terminal;
pub mod traversal;
mod window;

pub use error::{Error, Result};
pub use flags::Flags;
pub use pipeline::Pipeline;
pub use sort::SortedPipeline;
pub use source::{
    IntoPipeline, empty, generate, generate_n, once, range, range_from, range_step, repeat_forever,
    repeat_value,
};
pub use traversal::{Traversal, TraversalIter};
