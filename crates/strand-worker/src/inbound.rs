//! Inbound boundary: calls the runtime makes into a workflow instance.

use std::sync::Arc;

use async_trait::async_trait;

use strand_protocols::{Header, Payloads, WorkflowError};

use crate::outbound::WorkflowOutboundCallsInterceptor;

/// Arguments of the workflow entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowInput {
    pub header: Header,
    pub arguments: Option<Payloads>,
}

impl WorkflowInput {
    pub fn new(header: Header, arguments: Option<Payloads>) -> Self {
        Self { header, arguments }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowOutput {
    pub result: Option<Payloads>,
}

/// One signal delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalInput {
    pub signal_name: String,
    pub arguments: Option<Payloads>,
    /// History position of the signal event.
    pub event_id: i64,
}

impl SignalInput {
    pub fn new(signal_name: impl Into<String>, arguments: Option<Payloads>, event_id: i64) -> Self {
        Self {
            signal_name: signal_name.into(),
            arguments,
            event_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandleQueryInput {
    pub query_type: String,
    pub arguments: Option<Payloads>,
    pub header: Header,
}

impl HandleQueryInput {
    pub fn new(query_type: impl Into<String>, arguments: Option<Payloads>) -> Self {
        Self {
            query_type: query_type.into(),
            arguments,
            header: Header::empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandleQueryOutput {
    pub result: Option<Payloads>,
}

/// Capability set of every inbound layer.
///
/// `init` runs exactly once, before `execute`. `process_signal` and
/// `handle_query` never suspend.
#[async_trait]
pub trait WorkflowInboundCallsInterceptor: Send + Sync {
    /// Hand the instance its outbound boundary.
    ///
    /// A decorator may wrap `outbound` before passing it on.
    fn init(&self, outbound: Arc<dyn WorkflowOutboundCallsInterceptor>) -> Result<(), WorkflowError>;

    /// Run the workflow entry point to completion.
    async fn execute(&self, input: WorkflowInput) -> Result<WorkflowOutput, WorkflowError>;

    /// Deliver one signal. Decode failures are contained, never returned.
    fn process_signal(&self, input: SignalInput);

    fn handle_query(&self, input: HandleQueryInput) -> Result<HandleQueryOutput, WorkflowError>;
}

/// Factory adding a layer to the inbound chain of each workflow instance.
pub trait WorkerInterceptor: Send + Sync {
    fn intercept_workflow(
        &self,
        next: Arc<dyn WorkflowInboundCallsInterceptor>,
    ) -> Arc<dyn WorkflowInboundCallsInterceptor>;
}
