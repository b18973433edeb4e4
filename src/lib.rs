//! prioq – bounded, thread-safe priority queue.
//!
//! This crate exports
//!  * `core`    – priority domains, bucket stores and the queue controller
//!  * `config`  – TOML/YAML/env driven queue limits
//!  * `metrics` – per-queue counters
//!  * `logging` – tracing subscriber setup for binaries and tests
//!
//! Items are offered with a priority from a fixed domain and polled highest
//! priority first, FIFO within a priority. A full queue applies bounded
//! backpressure to producers.

// ───────────────────────────────────────────────────────────
// Public modules
// ───────────────────────────────────────────────────────────
pub mod config;
pub mod core;
pub mod logging;
pub mod metrics;

// ───────────────────────────────────────────────────────────
// Re-exports
// ───────────────────────────────────────────────────────────
pub use config::{load_config, QueueConfig};
pub use crate::core::error::{PutTimeoutCause, QueueError};
pub use crate::core::priority::{DenseIndex, Priority, PriorityDomain};
pub use crate::core::queue::{
    BucketStore, CustomPriorityQueue, DefaultPriorityQueue, IndexedBuckets,
    IntegerRangePriorityQueue, MappedBuckets, PriorityQueue,
};
