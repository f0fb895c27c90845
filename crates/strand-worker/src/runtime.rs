//! Contract of the cooperative scheduler hosting workflow code.

use std::time::Duration;

use async_trait::async_trait;

use strand_protocols::WorkflowError;

use crate::outbound::{ActivityInput, ActivityOutput};

/// Runtime primitives that suspend workflow code.
///
/// Implementations record these calls in the workflow history and resolve
/// them on replay, which keeps re-execution deterministic.
#[async_trait]
pub trait WorkflowRuntime: Send + Sync {
    /// Schedule an activity and wait for its completion.
    async fn execute_activity(&self, input: ActivityInput) -> Result<ActivityOutput, WorkflowError>;

    /// Durable timer.
    async fn sleep(&self, duration: Duration) -> Result<(), WorkflowError>;

    /// Deterministic workflow clock, in milliseconds since the epoch.
    fn current_time_millis(&self) -> i64;
}
