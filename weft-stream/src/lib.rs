//! # Weft Stream
//!
//! Lazily evaluated, ordered stream pipelines.
//!
//! A [`StreamPipeline`] is a recipe: a source plus a chain of stages. Building
//! one does no work. Each terminal operation returns a
//! [`DeferredValue`](weft_core::DeferredValue), and only materializing that
//! value pulls elements through the chain, one element at a time.
//!
//! ## Stages
//!
//! - **Elementwise**: `map`, `filter`, `remove`, `replace`, `inspect`
//! - **Positional**: `take`, `skip`, `take_while`, `drop_while`
//! - **Stateful**: `scan`, `invert` (which buffers the whole upstream)
//! - **Combining**: `concat`
//!
//! ## Failures
//!
//! A stage function that fails turns into a
//! [`PipelineError::EvaluationFailure`](weft_core::PipelineError) attributed to
//! that stage. The failure travels past every later stage untouched and the
//! terminal resolves with it; elements after the failure are never pulled.

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod pipeline;
pub mod stage;

pub use pipeline::{Elements, StreamPipeline};
pub use stage::StageKind;

#[cfg(feature = "async")]
mod bridge {
    use super::{Elements, StreamPipeline};

    impl<T: Send + 'static> StreamPipeline<T> {
        /// Expose one materialization as a [`futures::Stream`].
        ///
        /// Elements are produced synchronously on each poll; the stream ends
        /// right after the first failure, just like [`iter`](Self::iter).
        #[must_use]
        pub fn into_stream(&self) -> futures::stream::Iter<Elements<T>> {
            futures::stream::iter(self.iter())
        }
    }

}
