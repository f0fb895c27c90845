//! Orchestration service errors.

use thiserror::Error;

/// Conditions reported by the orchestration service or its transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// A start was rejected because the workflow id is already in use.
    #[error("Workflow already started: workflow_id={workflow_id}, run_id={run_id}")]
    AlreadyStarted { workflow_id: String, run_id: String },

    #[error("Not found: {0}")]
    NotFound(String),

    /// The service could not be reached.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// A single RPC exceeded its own deadline.
    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),

    #[error("Invalid request: {0}")]
    InvalidArgument(String),

    #[error("Internal service error: {0}")]
    Internal(String),
}
