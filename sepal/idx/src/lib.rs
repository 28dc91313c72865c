//! Typed index handles and index-addressed storage for the simulation
//! kernel.
//!
//! Every long-lived object in the kernel (process descriptors, signal
//! cells, sensitivity bindings) lives in an arena addressed by a newtype
//! wrapper around a `u32`. Intrusive structures such as the event queue
//! and the active-signal list store these handles rather than references,
//! so growing an arena never invalidates outstanding links.

mod index_trait;
mod indexed_map;
mod macros;

pub use index_trait::{IndexRange, IndexRangeIterator, IndexRef};
pub use indexed_map::IndexedMap;
