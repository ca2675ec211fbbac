//! Error type returned by payload handlers.
//!
//! A handler that cannot process a payload returns a [`ConsumeError`] instead
//! of panicking. The subscriber worker reports the error through its fault
//! sink and continues with the next queued payload; the error never reaches
//! the registry or the producer.

use thiserror::Error;

/// # Errors produced by payload handlers.
///
/// Raised inside [`Consume::consume`](crate::Consume::consume) and caught at
/// the invocation site by the subscriber worker.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConsumeError {
    /// Handler could not process the payload.
    #[error("handler failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },
}

impl ConsumeError {
    /// Creates a [`ConsumeError::Fail`] from any displayable message.
    ///
    /// # Example
    /// ```
    /// use datafan::ConsumeError;
    ///
    /// let err = ConsumeError::fail("parse error");
    /// assert_eq!(err.as_label(), "consume_failed");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        ConsumeError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConsumeError::Fail { .. } => "consume_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConsumeError::Fail { error } => format!("error: {error}"),
        }
    }
}
