//! # Weft Core
//!
//! Core abstractions for the Weft pipeline library.
//!
//! Weft models two lazy evaluation shapes over ordered data: a one-shot
//! [`DeferredValue`] that yields a single result, and the stream pipelines in
//! `weft-stream` that yield ordered sequences. This crate holds the pieces both
//! share: the deferred container itself and the error taxonomy.
//!
//! ## Design Principles
//!
//! - **Lazy**: nothing is computed until a result is asked for
//! - **Single resolution**: a deferred value resolves or fails exactly once
//! - **Fail-fast**: the first failure is surfaced to the caller, never swallowed

#![deny(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fmt;

pub mod deferred;
pub mod error;

pub use deferred::{DeferredState, DeferredValue};
pub use error::{PipelineError, PipelineResult};

/// Validate an element count supplied to `operation`.
///
/// Any integer type is accepted; values that do not fit a `usize` (negative
/// numbers) are rejected with [`PipelineError::InvalidArgument`].
///
/// ```rust
/// use weft_core::checked_count;
///
/// assert_eq!(checked_count("take", 3), Ok(3));
/// assert!(checked_count("drop", -1).is_err());
/// ```
pub fn checked_count<N>(operation: &'static str, count: N) -> PipelineResult<usize>
where
    N: TryInto<usize> + Copy + fmt::Display,
{
    count.try_into().map_err(|_| {
        PipelineError::invalid_argument(
            operation,
            format!("count must be a non-negative integer, got {count}"),
        )
    })
}
