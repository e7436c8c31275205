//! Error types for the range lock crates
//!
//! This module defines the error types used throughout the `rangelock` workspace.

use thiserror::Error;

/// The main error type for range lock construction.
///
/// Operations on a live `RangeLock` (`try_lock`, `release_lock`, `search_lock`)
/// never return this type: per the overlap/misuse taxonomy they surface purely
/// as booleans, so concurrent retries never need to propagate an error. This
/// type exists only for misconfiguration caught at construction time.
#[derive(Error, Debug)]
pub enum Error {
    /// The requested skip list height was zero. Height must satisfy `H >= 1`.
    #[error("invalid height: {0} (must be >= 1)")]
    InvalidHeight(usize),
}

/// A specialized Result type for range lock construction.
pub type Result<T> = std::result::Result<T, Error>;
