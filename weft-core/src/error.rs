//! Error types and handling for Weft pipelines.

use std::any::Any;
use thiserror::Error;

/// Errors surfaced when a deferred value or stream pipeline is materialized.
#[allow(clippy::module_name_repetitions)]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A parameter was malformed, e.g. a negative element count.
    #[error("invalid argument to `{operation}`: {reason}")]
    InvalidArgument {
        /// Operation that rejected the argument
        operation: &'static str,
        /// Human readable description of the problem
        reason: String,
    },

    /// A user-supplied function returned an error or panicked.
    #[error("evaluation failed in `{stage}`: {message}")]
    EvaluationFailure {
        /// Operation or stage whose function failed
        stage: &'static str,
        /// Message carried by the underlying error or panic payload
        message: String,
    },

    /// The result of a deferred value was already handed out.
    #[error("deferred value `{operation}` was already materialized")]
    AlreadyMaterialized {
        /// Operation that produced the deferred value
        operation: &'static str,
    },
}

impl PipelineError {
    /// Create an [`PipelineError::InvalidArgument`].
    pub fn invalid_argument(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            operation,
            reason: reason.into(),
        }
    }

    /// Create an [`PipelineError::EvaluationFailure`].
    pub fn evaluation_failure(stage: &'static str, message: impl Into<String>) -> Self {
        Self::EvaluationFailure {
            stage,
            message: message.into(),
        }
    }

    /// Wrap an error returned by a user function.
    pub fn from_source<E>(stage: &'static str, source: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        Self::evaluation_failure(stage, source.to_string())
    }

    /// Build an evaluation failure from a captured panic payload.
    pub fn from_panic(stage: &'static str, payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "panic with non-string payload".to_string()
        };
        Self::evaluation_failure(stage, format!("panicked: {message}"))
    }

    /// The operation or stage this error is attributed to.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::InvalidArgument { operation, .. } | Self::AlreadyMaterialized { operation } => {
                operation
            }
            Self::EvaluationFailure { stage, .. } => stage,
        }
    }

    /// Returns `true` for [`PipelineError::InvalidArgument`].
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Returns `true` for [`PipelineError::EvaluationFailure`].
    #[must_use]
    pub fn is_evaluation_failure(&self) -> bool {
        matches!(self, Self::EvaluationFailure { .. })
    }
}

/// A result type for pipeline materialization.
pub type PipelineResult<T> = Result<T, PipelineError>;
