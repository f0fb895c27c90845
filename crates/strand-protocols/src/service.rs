//! Orchestration service RPC contract.
//!
//! The wire transport is not part of this crate; a transport implements
//! [`WorkflowService`] and the client call chain terminates in it.

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::types::{Header, Payloads, WorkflowExecution, WorkflowExecutionStatus, WorkflowOptions};

/// Request to create a new workflow execution.
#[derive(Debug, Clone, PartialEq)]
pub struct StartWorkflowExecutionRequest {
    pub namespace: String,
    pub workflow_id: String,
    pub workflow_type: String,
    pub options: WorkflowOptions,
    pub input: Option<Payloads>,
    pub header: Header,
    pub identity: String,
    pub request_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartWorkflowExecutionResponse {
    pub run_id: String,
}

/// Request to deliver a signal to a running execution.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalWorkflowExecutionRequest {
    pub namespace: String,
    pub execution: WorkflowExecution,
    pub signal_name: String,
    pub input: Option<Payloads>,
    pub header: Header,
    pub identity: String,
    pub request_id: String,
}

/// Atomic start-if-not-running plus signal.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalWithStartWorkflowExecutionRequest {
    pub start: StartWorkflowExecutionRequest,
    pub signal_name: String,
    pub signal_input: Option<Payloads>,
}

/// Long poll for the close event of an execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetWorkflowCloseEventRequest {
    pub namespace: String,
    pub execution: WorkflowExecution,
}

/// Terminal event of an execution.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowCloseEvent {
    Completed { result: Option<Payloads> },
    Failed { message: String },
    Canceled { details: Option<Payloads> },
    Terminated { reason: String },
    TimedOut,
    ContinuedAsNew { new_run_id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetWorkflowCloseEventResponse {
    /// `None` when the long poll window elapsed without the workflow closing.
    pub close_event: Option<WorkflowCloseEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryWorkflowRequest {
    pub namespace: String,
    pub execution: WorkflowExecution,
    pub query_type: String,
    pub query_args: Option<Payloads>,
    pub header: Header,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryWorkflowResponse {
    pub query_result: Option<Payloads>,
    /// Set when the workflow was not in a queryable state.
    pub query_rejected: Option<WorkflowExecutionStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestCancelWorkflowExecutionRequest {
    pub namespace: String,
    pub execution: WorkflowExecution,
    pub reason: Option<String>,
    pub identity: String,
    pub request_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TerminateWorkflowExecutionRequest {
    pub namespace: String,
    pub execution: WorkflowExecution,
    pub reason: String,
    pub details: Option<Payloads>,
    pub identity: String,
}

/// RPC surface of the orchestration service used beneath the client chain.
#[async_trait]
pub trait WorkflowService: Send + Sync {
    async fn start_workflow_execution(
        &self,
        request: StartWorkflowExecutionRequest,
    ) -> Result<StartWorkflowExecutionResponse, ServiceError>;

    async fn signal_workflow_execution(
        &self,
        request: SignalWorkflowExecutionRequest,
    ) -> Result<(), ServiceError>;

    async fn signal_with_start_workflow_execution(
        &self,
        request: SignalWithStartWorkflowExecutionRequest,
    ) -> Result<StartWorkflowExecutionResponse, ServiceError>;

    async fn get_workflow_close_event(
        &self,
        request: GetWorkflowCloseEventRequest,
    ) -> Result<GetWorkflowCloseEventResponse, ServiceError>;

    async fn query_workflow(
        &self,
        request: QueryWorkflowRequest,
    ) -> Result<QueryWorkflowResponse, ServiceError>;

    async fn request_cancel_workflow_execution(
        &self,
        request: RequestCancelWorkflowExecutionRequest,
    ) -> Result<(), ServiceError>;

    async fn terminate_workflow_execution(
        &self,
        request: TerminateWorkflowExecutionRequest,
    ) -> Result<(), ServiceError>;
}
