//! Errors surfaced on the workflow execution side.

use thiserror::Error;

use super::DataConversionError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A programming error, such as registering the same handler twice.
    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Data conversion error: {0}")]
    DataConversion(#[from] DataConversionError),

    #[error("Unknown query type \"{query_type}\", known types: [{}]", .known.join(", "))]
    UnknownQuery {
        query_type: String,
        known: Vec<String>,
    },

    #[error("Activity {activity_type} failed: {message}")]
    ActivityFailed {
        activity_type: String,
        message: String,
    },

    /// Application failure raised by workflow code.
    #[error("Workflow failed: {0}")]
    Failed(String),
}

impl WorkflowError {
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState(message.into())
    }

    pub fn is_illegal_state(&self) -> bool {
        matches!(self, Self::IllegalState(_))
    }
}
