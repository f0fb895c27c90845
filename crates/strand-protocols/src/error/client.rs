//! Errors surfaced through the workflow client call chain.

use std::time::Duration;

use thiserror::Error;

use super::{DataConversionError, InvalidArgumentError, ServiceError};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgumentError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Data conversion error: {0}")]
    DataConversion(#[from] DataConversionError),

    /// The result deadline elapsed while the workflow was still running.
    #[error("Timed out after {timeout:?} waiting for workflow {workflow_id} (run {run_id:?})")]
    Timeout {
        workflow_id: String,
        run_id: Option<String>,
        timeout: Duration,
    },

    #[error("Workflow {workflow_id} failed: {message}")]
    WorkflowFailed { workflow_id: String, message: String },

    #[error("Workflow {workflow_id} was canceled")]
    WorkflowCanceled { workflow_id: String },

    #[error("Workflow {workflow_id} was terminated: {reason}")]
    WorkflowTerminated { workflow_id: String, reason: String },

    #[error("Workflow {workflow_id} exceeded its execution timeout")]
    WorkflowTimedOut { workflow_id: String },
}

impl ClientError {
    /// Whether this is a client-side result deadline (workflow still running).
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Whether the service itself could not be reached.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Service(ServiceError::Unavailable(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_distinct_from_unavailable() {
        let timeout = ClientError::Timeout {
            workflow_id: "wf".to_string(),
            run_id: None,
            timeout: Duration::from_secs(5),
        };
        let unavailable = ClientError::from(ServiceError::Unavailable("down".to_string()));

        assert!(timeout.is_timeout());
        assert!(!timeout.is_unavailable());
        assert!(unavailable.is_unavailable());
        assert!(!unavailable.is_timeout());
    }

    #[test]
    fn test_invalid_argument_transparent() {
        let err = ClientError::from(InvalidArgumentError::required("workflow_type"));
        assert_eq!(err.to_string(), "Invalid argument: workflow_type is required");
    }

    #[test]
    fn test_workflow_failed_display() {
        let err = ClientError::WorkflowFailed {
            workflow_id: "wf".to_string(),
            message: "boom".to_string(),
        };
        assert!(err.to_string().contains("boom"));
    }
}
