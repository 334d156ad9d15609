//! # Weft - Lazy Threads of Data
//!
//! Weft offers two lazy evaluation shapes over ordered data:
//!
//! - [`DeferredValue`]: a one-shot computation producing a single value or a
//!   single error, run at most once and only when asked for
//! - [`StreamPipeline`]: a reusable chain of stages over an ordered source,
//!   pulled one element at a time by a terminal operation
//!
//! The [`list`] module bridges the two worlds with whole-list transformations
//! that return deferred values.
//!
//! ## Features
//!
//! - **Lazy**: building a computation never runs it
//! - **Fail-fast**: the first failure aborts the computation and is reported
//!   once, attributed to the stage that raised it
//! - **Awaitable**: every deferred value is a [`Future`](std::future::Future)
//! - **Async streams**: with the `async` feature, pipelines convert into
//!   [`futures::Stream`](https://docs.rs/futures)s
//!
//! ## Quick Start
//!
//! ```rust
//! use weft::prelude::*;
//!
//! let total = list::fold(vec![1, 2, 3, 4, 5], 0, |acc, x| acc + x);
//! assert_eq!(total.materialize(), Ok(15));
//!
//! let scanned = StreamPipeline::just([1, 2, 3]).scan(1, |acc, v| acc * v);
//! assert_eq!(scanned.collect_to_list().materialize(), Ok(vec![1, 2, 6]));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

// Re-export core functionality
pub use weft_core::{
    checked_count, DeferredState, DeferredValue, PipelineError, PipelineResult,
};

// Re-export stream functionality
pub use weft_stream::{stage, Elements, StageKind, StreamPipeline};

/// Deferred whole-list transformations.
pub mod list {
    pub use weft_list::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    //! Common imports for Weft users.

    pub use crate::list;
    pub use crate::{DeferredState, DeferredValue, PipelineError, PipelineResult, StreamPipeline};
}
