//! Host wiring one workflow definition behind the interceptor chains.

use std::sync::Arc;

use tracing::debug;

use strand_protocols::{
    build_chain, JsonPayloadConverter, MetricsScope, NoopMetricsScope, PayloadConverter,
    WorkflowError,
};

use crate::gate::ExecutionGate;
use crate::inbound::{
    HandleQueryInput, HandleQueryOutput, SignalInput, WorkerInterceptor,
    WorkflowInboundCallsInterceptor, WorkflowInput, WorkflowOutput,
};
use crate::outbound::{RootWorkflowOutbound, WorkflowOutboundCallsInterceptor};
use crate::query_dispatcher::QueryDispatcher;
use crate::root::RootWorkflowInbound;
use crate::runtime::WorkflowRuntime;
use crate::signal_dispatcher::SignalDispatcher;
use crate::workflow::WorkflowDefinition;

/// Per-instance configuration.
#[derive(Clone)]
pub struct WorkflowInstanceOptions {
    /// Inbound decorators in chain order; the first one is outermost.
    pub interceptors: Vec<Arc<dyn WorkerInterceptor>>,
    pub converter: Arc<dyn PayloadConverter>,
    pub metrics: Arc<dyn MetricsScope>,
    pub buffered_signal_warn_threshold: Option<usize>,
}

impl Default for WorkflowInstanceOptions {
    fn default() -> Self {
        Self {
            interceptors: Vec::new(),
            converter: Arc::new(JsonPayloadConverter),
            metrics: Arc::new(NoopMetricsScope),
            buffered_signal_warn_threshold: None,
        }
    }
}

impl WorkflowInstanceOptions {
    pub fn with_interceptor(mut self, interceptor: Arc<dyn WorkerInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn with_converter(mut self, converter: Arc<dyn PayloadConverter>) -> Self {
        self.converter = converter;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsScope>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_buffered_signal_warn_threshold(mut self, threshold: Option<usize>) -> Self {
        self.buffered_signal_warn_threshold = threshold;
        self
    }
}

impl std::fmt::Debug for WorkflowInstanceOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowInstanceOptions")
            .field("interceptors", &self.interceptors.len())
            .field(
                "buffered_signal_warn_threshold",
                &self.buffered_signal_warn_threshold,
            )
            .finish_non_exhaustive()
    }
}

/// One workflow instance.
///
/// Every entry point holds the instance's [`ExecutionGate`] while it runs,
/// so at most one of them is active at a time.
pub struct WorkflowInstance {
    workflow_type: String,
    inbound: Arc<dyn WorkflowInboundCallsInterceptor>,
    outbound: Arc<dyn WorkflowOutboundCallsInterceptor>,
    signals: Arc<SignalDispatcher>,
    queries: Arc<QueryDispatcher>,
    gate: Arc<ExecutionGate>,
}

impl WorkflowInstance {
    pub fn new(
        workflow: Arc<dyn WorkflowDefinition>,
        runtime: Arc<dyn WorkflowRuntime>,
        options: WorkflowInstanceOptions,
    ) -> Self {
        let workflow_type = workflow.workflow_type().to_string();
        let signals = Arc::new(
            SignalDispatcher::new(options.converter.clone(), options.metrics.as_ref())
                .with_buffer_warn_threshold(options.buffered_signal_warn_threshold),
        );
        let queries = Arc::new(QueryDispatcher::new(options.converter.clone()));
        let gate = Arc::new(ExecutionGate::new());

        let outbound: Arc<dyn WorkflowOutboundCallsInterceptor> = Arc::new(RootWorkflowOutbound::new(
            signals.clone(),
            queries.clone(),
            runtime,
            gate.clone(),
        ));
        let root: Arc<dyn WorkflowInboundCallsInterceptor> = Arc::new(RootWorkflowInbound::new(
            workflow,
            signals.clone(),
            queries.clone(),
            options.converter,
        ));
        let inbound = build_chain(
            root,
            options.interceptors.iter().map(|interceptor| {
                move |next: Arc<dyn WorkflowInboundCallsInterceptor>| {
                    interceptor.intercept_workflow(next)
                }
            }),
        );

        Self {
            workflow_type,
            inbound,
            outbound,
            signals,
            queries,
            gate,
        }
    }

    pub fn workflow_type(&self) -> &str {
        &self.workflow_type
    }

    /// Give workflow code its outbound handle. Exactly once.
    pub async fn init(&self) -> Result<(), WorkflowError> {
        debug!(workflow_type = %self.workflow_type, "Initializing workflow instance");
        self.gate
            .active(async { self.inbound.init(self.outbound.clone()) })
            .await
    }

    /// Run the entry point. Signals and queries may interleave at its
    /// await points.
    pub async fn execute(&self, input: WorkflowInput) -> Result<WorkflowOutput, WorkflowError> {
        self.gate.active(self.inbound.execute(input)).await
    }

    /// Deliver a signal once no other operation is active.
    pub async fn process_signal(&self, input: SignalInput) -> Result<(), WorkflowError> {
        self.gate
            .active(async {
                self.inbound.process_signal(input);
                Ok(())
            })
            .await
    }

    pub async fn handle_query(&self, input: HandleQueryInput) -> Result<HandleQueryOutput, WorkflowError> {
        self.gate
            .active(async { self.inbound.handle_query(input) })
            .await
    }

    pub fn signal_dispatcher(&self) -> &Arc<SignalDispatcher> {
        &self.signals
    }

    pub fn query_dispatcher(&self) -> &Arc<QueryDispatcher> {
        &self.queries
    }
}

#[cfg(test)]
#[path = "instance_tests.rs"]
mod tests;
