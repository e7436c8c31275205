//! A concurrent range lock for half-open integer intervals `[start, end)`.
//!
//! `RangeLock` lets independent threads reserve disjoint ranges of an
//! integer key space concurrently, without taking out a single global lock
//! for the whole space. It is built as a skip list ordered by interval
//! `start`, with one node per currently-held range:
//!
//! - **[`node`]**: the interval node — `start`/`end`, per-level forward
//!   pointers, and the `fully_linked`/`marked` lifecycle flags.
//! - **[`height`]**: the random height sampler used to decide how many
//!   levels a newly inserted node occupies.
//! - **[`navigator`]**: the lock-free descent that locates the
//!   predecessor/successor neighborhood of a query interval at every level.
//! - **[`range_lock`]**: [`RangeLock`] itself — `try_lock`, `release_lock`,
//!   `search_lock`, `size`, and the debug `display_to`.
//!
//! # Concurrency model
//!
//! Reads (`search_lock`, and the overlap check inside `try_lock`) never take
//! a lock: they walk `next[..]` pointers published with `Release` ordering
//! and loaded with `Acquire`. Writers (`try_lock`, `release_lock`) lock only
//! the handful of predecessor nodes they are about to mutate, always
//! bottom-up and in list order, which rules out deadlock between concurrent
//! writers. Node memory is reclaimed through `crossbeam`'s epoch-based
//! garbage collector, since a node unlinked by one thread may still be
//! referenced by another thread's in-flight, lock-free traversal.
//!
//! # Example
//!
//! ```
//! use rangelock::RangeLock;
//!
//! let locks: RangeLock<i64> = RangeLock::new();
//! assert!(locks.try_lock(0, 10));
//! assert!(!locks.try_lock(5, 15)); // overlaps [0, 10)
//! assert!(locks.try_lock(10, 15)); // adjacent, not overlapping
//! assert!(locks.release_lock(0, 10));
//! assert!(locks.try_lock(5, 15)); // now free
//! ```

mod config;
mod height;
mod navigator;
mod node;
mod range_lock;

pub use config::RangeLockConfig;
pub use range_lock::RangeLock;
pub use rangelock_core::{Error, Interval, RangeBound, Result};
