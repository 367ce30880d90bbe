//! Batch planning
//!
//! Splits an ordered item list into size-bounded batches. Pure functions with
//! no I/O; batches borrow the caller's items.

mod partition;

pub use partition::{Batch, BatchSet, partition, plan};
