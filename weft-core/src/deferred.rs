//! # Deferred values
//!
//! A [`DeferredValue`] wraps a computation that produces exactly one value or
//! one error. Nothing runs when the value is constructed; the computation is
//! executed the first time the value is materialized.
//!
//! ## Lifecycle
//!
//! - **Pending**: the thunk has not run yet
//! - **Resolved / Failed**: the thunk ran exactly once and its outcome is held
//! - **Consumed**: the outcome has been handed out through the `Future` impl
//!
//! ## Examples
//!
//! ```rust
//! use weft_core::{DeferredValue, DeferredState};
//!
//! let mut doubled = DeferredValue::new(|| 21).map(|x| x * 2);
//! assert_eq!(doubled.state(), DeferredState::Pending);
//!
//! assert_eq!(doubled.evaluate(), DeferredState::Resolved);
//! assert_eq!(doubled.materialize(), Ok(42));
//! ```

use crate::error::{PipelineError, PipelineResult};
use std::fmt;
use std::future::Future;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::task::{Context, Poll};

type Thunk<T> = Box<dyn FnOnce() -> PipelineResult<T> + Send + 'static>;

/// Observable evaluation state of a [`DeferredValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeferredState {
    /// The computation has not run yet
    Pending,
    /// The computation produced a value
    Resolved,
    /// The computation produced an error
    Failed,
    /// The outcome has already been taken
    Consumed,
}

impl fmt::Display for DeferredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Resolved => write!(f, "resolved"),
            Self::Failed => write!(f, "failed"),
            Self::Consumed => write!(f, "consumed"),
        }
    }
}

enum Slot<T> {
    Pending(Thunk<T>),
    Resolved(T),
    Failed(PipelineError),
    Consumed,
}

/// A lazy, one-shot handle to a single computed value.
pub struct DeferredValue<T> {
    slot: Slot<T>,
    name: &'static str,
}

impl<T: Send + 'static> DeferredValue<T> {
    /// Defer an infallible computation.
    pub fn new<F>(func: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self::try_new(move || Ok(func()))
    }

    /// Defer a computation that may fail.
    pub fn try_new<F>(func: F) -> Self
    where
        F: FnOnce() -> PipelineResult<T> + Send + 'static,
    {
        Self {
            slot: Slot::Pending(Box::new(func)),
            name: "deferred",
        }
    }

    /// Set the operation name used in tracing output and error attribution.
    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// The operation name of this value.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current evaluation state, without triggering evaluation.
    #[must_use]
    pub fn state(&self) -> DeferredState {
        match self.slot {
            Slot::Pending(_) => DeferredState::Pending,
            Slot::Resolved(_) => DeferredState::Resolved,
            Slot::Failed(_) => DeferredState::Failed,
            Slot::Consumed => DeferredState::Consumed,
        }
    }

    /// Run the computation if it is still pending and report the new state.
    ///
    /// Calling this again after the first evaluation never re-runs the thunk.
    pub fn evaluate(&mut self) -> DeferredState {
        self.slot = match mem::replace(&mut self.slot, Slot::Consumed) {
            Slot::Pending(thunk) => {
                tracing::trace!(operation = self.name, "evaluating deferred value");
                match run_guarded(self.name, thunk) {
                    Ok(value) => Slot::Resolved(value),
                    Err(err) => {
                        tracing::trace!(
                            operation = self.name,
                            error = %err,
                            "deferred value failed"
                        );
                        Slot::Failed(err)
                    }
                }
            }
            settled => settled,
        };
        self.state()
    }

    /// Evaluate and return the outcome.
    pub fn materialize(mut self) -> PipelineResult<T> {
        self.take_outcome()
    }

    /// Evaluate and deliver the outcome to exactly one of the callbacks.
    pub fn subscribe<V, E>(self, on_value: V, on_error: E)
    where
        V: FnOnce(T),
        E: FnOnce(PipelineError),
    {
        match self.materialize() {
            Ok(value) => on_value(value),
            Err(err) => on_error(err),
        }
    }

    /// Lazily transform the resolved value.
    pub fn map<U, F>(self, func: F) -> DeferredValue<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let name = self.name;
        DeferredValue::try_new(move || self.materialize().map(func)).named(name)
    }

    /// Lazily chain another deferred computation onto the resolved value.
    pub fn and_then<U, F>(self, func: F) -> DeferredValue<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> DeferredValue<U> + Send + 'static,
    {
        let name = self.name;
        DeferredValue::try_new(move || {
            self.materialize()
                .and_then(|value| func(value).materialize())
        })
        .named(name)
    }

    /// Pair this value with another; the receiver is evaluated first and a
    /// failure there short-circuits `other`.
    pub fn zip<U>(self, other: DeferredValue<U>) -> DeferredValue<(T, U)>
    where
        U: Send + 'static,
    {
        let name = self.name;
        DeferredValue::try_new(move || {
            let left = self.materialize()?;
            let right = other.materialize()?;
            Ok((left, right))
        })
        .named(name)
    }

    fn take_outcome(&mut self) -> PipelineResult<T> {
        self.evaluate();
        match mem::replace(&mut self.slot, Slot::Consumed) {
            Slot::Resolved(value) => Ok(value),
            Slot::Failed(err) => Err(err),
            Slot::Pending(_) | Slot::Consumed => Err(PipelineError::AlreadyMaterialized {
                operation: self.name,
            }),
        }
    }
}

impl<T> DeferredValue<T> {
    /// A value that is already resolved.
    pub fn resolved(value: T) -> Self {
        Self {
            slot: Slot::Resolved(value),
            name: "resolved",
        }
    }

    /// A value that is already failed.
    pub fn failed(error: PipelineError) -> Self {
        Self {
            name: error.operation(),
            slot: Slot::Failed(error),
        }
    }
}

impl<T: Send + 'static> From<PipelineResult<T>> for DeferredValue<T> {
    fn from(result: PipelineResult<T>) -> Self {
        match result {
            Ok(value) => Self::resolved(value),
            Err(err) => Self::failed(err),
        }
    }
}

impl<T> fmt::Debug for DeferredValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.slot {
            Slot::Pending(_) => DeferredState::Pending,
            Slot::Resolved(_) => DeferredState::Resolved,
            Slot::Failed(_) => DeferredState::Failed,
            Slot::Consumed => DeferredState::Consumed,
        };
        f.debug_struct("DeferredValue")
            .field("name", &self.name)
            .field("state", &state)
            .finish()
    }
}

// The slot is never structurally pinned.
impl<T> Unpin for DeferredValue<T> {}

impl<T: Send + 'static> Future for DeferredValue<T> {
    type Output = PipelineResult<T>;

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        Poll::Ready(self.get_mut().take_outcome())
    }
}

fn run_guarded<T>(name: &'static str, thunk: Thunk<T>) -> PipelineResult<T> {
    match panic::catch_unwind(AssertUnwindSafe(thunk)) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let err = PipelineError::from_panic(name, payload.as_ref());
            tracing::warn!(operation = name, error = %err, "captured panic during evaluation");
            Err(err)
        }
    }
}
