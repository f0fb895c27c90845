//! Outbound boundary: calls workflow code makes into the runtime.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use strand_protocols::{Header, Payloads, WorkflowError};

use crate::gate::ExecutionGate;
use crate::handlers::{DynamicSignalHandler, QueryRegistrationRequest, SignalRegistrationRequest};
use crate::query_dispatcher::QueryDispatcher;
use crate::runtime::WorkflowRuntime;
use crate::signal_dispatcher::SignalDispatcher;

/// A batch of signal handler bindings.
#[derive(Debug, Clone)]
pub struct RegisterSignalHandlersInput {
    requests: Vec<SignalRegistrationRequest>,
}

impl RegisterSignalHandlersInput {
    pub fn new(requests: Vec<SignalRegistrationRequest>) -> Self {
        Self { requests }
    }

    pub fn requests(&self) -> &[SignalRegistrationRequest] {
        &self.requests
    }

    pub fn into_requests(self) -> Vec<SignalRegistrationRequest> {
        self.requests
    }
}

#[derive(Clone)]
pub struct RegisterDynamicSignalHandlerInput {
    handler: Arc<dyn DynamicSignalHandler>,
}

impl RegisterDynamicSignalHandlerInput {
    pub fn new(handler: Arc<dyn DynamicSignalHandler>) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &Arc<dyn DynamicSignalHandler> {
        &self.handler
    }
}

#[derive(Debug, Clone)]
pub struct RegisterQueryInput {
    request: QueryRegistrationRequest,
}

impl RegisterQueryInput {
    pub fn new(request: QueryRegistrationRequest) -> Self {
        Self { request }
    }

    pub fn request(&self) -> &QueryRegistrationRequest {
        &self.request
    }

    pub fn into_request(self) -> QueryRegistrationRequest {
        self.request
    }
}

/// An activity invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityInput {
    pub activity_type: String,
    pub arguments: Option<Payloads>,
    pub header: Header,
    /// Bound on a single attempt, left to the runtime when absent.
    pub start_to_close_timeout: Option<Duration>,
}

impl ActivityInput {
    pub fn new(activity_type: impl Into<String>, arguments: Option<Payloads>) -> Self {
        Self {
            activity_type: activity_type.into(),
            arguments,
            header: Header::empty(),
            start_to_close_timeout: None,
        }
    }

    pub fn with_header(mut self, header: Header) -> Self {
        self.header = header;
        self
    }

    pub fn with_start_to_close_timeout(mut self, timeout: Duration) -> Self {
        self.start_to_close_timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityOutput {
    pub result: Option<Payloads>,
}

/// Capability set of every outbound layer.
///
/// Registration calls never suspend. The runtime primitives suspend the
/// calling workflow code.
#[async_trait]
pub trait WorkflowOutboundCallsInterceptor: Send + Sync {
    fn register_signal_handlers(&self, input: RegisterSignalHandlersInput) -> Result<(), WorkflowError>;

    fn register_dynamic_signal_handler(
        &self,
        input: RegisterDynamicSignalHandlerInput,
    ) -> Result<(), WorkflowError>;

    fn register_query(&self, input: RegisterQueryInput) -> Result<(), WorkflowError>;

    async fn execute_activity(&self, input: ActivityInput) -> Result<ActivityOutput, WorkflowError>;

    async fn sleep(&self, duration: Duration) -> Result<(), WorkflowError>;

    fn current_time_millis(&self) -> i64;
}

/// Terminal outbound layer: registrations go to the dispatchers, runtime
/// primitives go to the scheduler with the execution token released.
pub struct RootWorkflowOutbound {
    signals: Arc<SignalDispatcher>,
    queries: Arc<QueryDispatcher>,
    runtime: Arc<dyn WorkflowRuntime>,
    gate: Arc<ExecutionGate>,
}

impl RootWorkflowOutbound {
    pub fn new(
        signals: Arc<SignalDispatcher>,
        queries: Arc<QueryDispatcher>,
        runtime: Arc<dyn WorkflowRuntime>,
        gate: Arc<ExecutionGate>,
    ) -> Self {
        Self {
            signals,
            queries,
            runtime,
            gate,
        }
    }
}

#[async_trait]
impl WorkflowOutboundCallsInterceptor for RootWorkflowOutbound {
    fn register_signal_handlers(&self, input: RegisterSignalHandlersInput) -> Result<(), WorkflowError> {
        self.signals.register_signal_handlers(input.into_requests())
    }

    fn register_dynamic_signal_handler(
        &self,
        input: RegisterDynamicSignalHandlerInput,
    ) -> Result<(), WorkflowError> {
        self.signals.register_dynamic_signal_handler(input.handler)
    }

    fn register_query(&self, input: RegisterQueryInput) -> Result<(), WorkflowError> {
        self.queries.register(input.into_request())
    }

    async fn execute_activity(&self, input: ActivityInput) -> Result<ActivityOutput, WorkflowError> {
        self.gate.suspended(self.runtime.execute_activity(input)).await?
    }

    async fn sleep(&self, duration: Duration) -> Result<(), WorkflowError> {
        self.gate.suspended(self.runtime.sleep(duration)).await?
    }

    fn current_time_millis(&self) -> i64 {
        self.runtime.current_time_millis()
    }
}
