//! Workflow execution identity and start options.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identity of one workflow execution.
///
/// `run_id` is absent when the caller only knows the workflow id; the
/// service then resolves the latest run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowExecution {
    pub workflow_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

impl WorkflowExecution {
    pub fn new(workflow_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            run_id: Some(run_id.into()),
        }
    }

    /// Identity addressing the latest run of a workflow id.
    pub fn latest(workflow_id: impl Into<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            run_id: None,
        }
    }
}

impl std::fmt::Display for WorkflowExecution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.run_id {
            Some(run_id) => write!(f, "{}/{}", self.workflow_id, run_id),
            None => write!(f, "{}", self.workflow_id),
        }
    }
}

/// What the service does when a start request reuses a workflow id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowIdReusePolicy {
    /// Allow a new run once the previous one closed, whatever its outcome.
    #[default]
    AllowDuplicate,
    /// Allow a new run only if the previous one did not complete successfully.
    AllowDuplicateFailedOnly,
    /// Never allow a second run with the same id.
    RejectDuplicate,
}

/// Lifecycle status of a workflow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowExecutionStatus {
    Running,
    Completed,
    Failed,
    Canceled,
    Terminated,
    ContinuedAsNew,
    TimedOut,
}

impl WorkflowExecutionStatus {
    pub fn is_closed(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Options attached to a workflow start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowOptions {
    pub task_queue: String,
    #[serde(default)]
    pub id_reuse_policy: WorkflowIdReusePolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_timeout: Option<Duration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_timeout: Option<Duration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_timeout: Option<Duration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron_schedule: Option<String>,
}

impl WorkflowOptions {
    pub fn new(task_queue: impl Into<String>) -> Self {
        Self {
            task_queue: task_queue.into(),
            id_reuse_policy: WorkflowIdReusePolicy::default(),
            execution_timeout: None,
            run_timeout: None,
            task_timeout: None,
            cron_schedule: None,
        }
    }

    pub fn with_id_reuse_policy(mut self, policy: WorkflowIdReusePolicy) -> Self {
        self.id_reuse_policy = policy;
        self
    }

    pub fn with_execution_timeout(mut self, timeout: Duration) -> Self {
        self.execution_timeout = Some(timeout);
        self
    }

    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = Some(timeout);
        self
    }

    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = Some(timeout);
        self
    }

    pub fn with_cron_schedule(mut self, schedule: impl Into<String>) -> Self {
        self.cron_schedule = Some(schedule.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_display() {
        assert_eq!(WorkflowExecution::new("order-1", "run-9").to_string(), "order-1/run-9");
        assert_eq!(WorkflowExecution::latest("order-1").to_string(), "order-1");
    }

    #[test]
    fn test_reuse_policy_default() {
        assert_eq!(WorkflowIdReusePolicy::default(), WorkflowIdReusePolicy::AllowDuplicate);
    }

    #[test]
    fn test_reuse_policy_serialization() {
        let json = serde_json::to_string(&WorkflowIdReusePolicy::RejectDuplicate).unwrap();
        assert_eq!(json, "\"reject_duplicate\"");
    }

    #[test]
    fn test_status_is_closed() {
        assert!(!WorkflowExecutionStatus::Running.is_closed());
        assert!(WorkflowExecutionStatus::Completed.is_closed());
        assert!(WorkflowExecutionStatus::ContinuedAsNew.is_closed());
    }

    #[test]
    fn test_options_builder() {
        let options = WorkflowOptions::new("orders")
            .with_id_reuse_policy(WorkflowIdReusePolicy::RejectDuplicate)
            .with_execution_timeout(Duration::from_secs(3600))
            .with_cron_schedule("0 * * * *");

        assert_eq!(options.task_queue, "orders");
        assert_eq!(options.id_reuse_policy, WorkflowIdReusePolicy::RejectDuplicate);
        assert_eq!(options.execution_timeout, Some(Duration::from_secs(3600)));
        assert!(options.run_timeout.is_none());
        assert_eq!(options.cron_schedule.as_deref(), Some("0 * * * *"));
    }
}
