//! Core types and error handling shared by the `rangelock` crate.
//!
//! This crate contains the fundamental types used by the concurrent range
//! lock. It provides:
//!
//! - Common error type with [`Error`] and [`Result`]
//! - The ordered key-space trait [`RangeBound`] and the [`Interval`] type
//!
//! # Example
//!
//! ```
//! use rangelock_core::{Interval, RangeBound};
//!
//! let a = Interval::new(0u64, 10u64);
//! let b = Interval::new(5u64, 15u64);
//! assert!(a.overlaps(&b));
//! assert_eq!(u64::MIN, <u64 as RangeBound>::MIN);
//! ```

pub mod error;
pub mod key;

pub use error::{Error, Result};
pub use key::{Interval, RangeBound};
