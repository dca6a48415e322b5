#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

pub mod bounded_sorted;
pub mod error;
pub mod order;
pub mod ordered_map;
pub mod ring_buffer;

pub use bounded_sorted::{BoundedSortedSeq, Keep, SizeLimit};
pub use error::{Error, Result};
pub use order::Comparator;
pub use ordered_map::OrderedMap;
pub use ring_buffer::RingBuffer;
