//! Priority queue module.
//!
//! Defines the bucket storage abstraction and the queue controller built on it.
//! Every priority owns one FIFO bucket.
//!
//! Storage strategies:
//! - `IndexedBuckets` – dense `Vec` slots for contiguous priority runs
//! - `MappedBuckets`  – `HashMap` keyed by any hashable priority

pub mod indexed;
pub mod mapped;
pub mod priority_queue;

pub use indexed::IndexedBuckets;
pub use mapped::MappedBuckets;
pub use priority_queue::PriorityQueue;

use std::collections::VecDeque;

use crate::core::error::QueueError;
use crate::core::priority::{Priority, PriorityDomain};

/// Storage for one FIFO bucket per priority.
///
/// The controller only talks to storage through this trait, so it does not
/// care which strategy backs a given domain. Implementations are not
/// synchronised; the controller guards them.
pub trait BucketStore<P, M>: Send {
    /// Allocate one empty bucket per priority in `domain`.
    ///
    /// Fails with [`QueueError::Instantiation`] when the strategy cannot
    /// represent the domain.
    fn for_domain(domain: &PriorityDomain<P>) -> Result<Self, QueueError>
    where
        Self: Sized;

    /// The bucket for `priority`, or `None` when it was never allocated.
    fn get(&self, priority: &P) -> Option<&VecDeque<M>>;

    fn get_mut(&mut self, priority: &P) -> Option<&mut VecDeque<M>>;

    /// Total number of items across all buckets.
    fn size_all(&self) -> usize;

    /// Empty every bucket, returning how many items were discarded.
    fn clear_all(&mut self) -> usize;

    /// Short-circuits on the first non-empty bucket.
    fn is_empty_all(&self) -> bool;
}

/// Queue over the five-level [`Priority`] scale.
pub type DefaultPriorityQueue<M> = PriorityQueue<M, Priority, IndexedBuckets<Priority, M>>;

/// Queue over a contiguous `i32` range.
pub type IntegerRangePriorityQueue<M> = PriorityQueue<M, i32, IndexedBuckets<i32, M>>;

/// Queue over an arbitrary ordered, hashable priority type.
pub type CustomPriorityQueue<M, P> = PriorityQueue<M, P, MappedBuckets<P, M>>;
