//! Logging decorators for the inbound and outbound chains.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use strand_protocols::WorkflowError;

use crate::inbound::{
    HandleQueryInput, HandleQueryOutput, SignalInput, WorkerInterceptor,
    WorkflowInboundCallsInterceptor, WorkflowInput, WorkflowOutput,
};
use crate::outbound::{
    ActivityInput, ActivityOutput, RegisterDynamicSignalHandlerInput, RegisterQueryInput,
    RegisterSignalHandlersInput, WorkflowOutboundCallsInterceptor,
};

/// Adds tracing layers to the inbound chain and, through `init`, to the
/// outbound chain.
#[derive(Debug, Clone, Default)]
pub struct TracingWorkerInterceptor;

impl TracingWorkerInterceptor {
    pub fn new() -> Self {
        Self
    }
}

impl WorkerInterceptor for TracingWorkerInterceptor {
    fn intercept_workflow(
        &self,
        next: Arc<dyn WorkflowInboundCallsInterceptor>,
    ) -> Arc<dyn WorkflowInboundCallsInterceptor> {
        Arc::new(TracingWorkflowInbound { next })
    }
}

struct TracingWorkflowInbound {
    next: Arc<dyn WorkflowInboundCallsInterceptor>,
}

#[async_trait]
impl WorkflowInboundCallsInterceptor for TracingWorkflowInbound {
    fn init(&self, outbound: Arc<dyn WorkflowOutboundCallsInterceptor>) -> Result<(), WorkflowError> {
        debug!("init");
        self.next.init(Arc::new(TracingWorkflowOutbound { next: outbound }))
    }

    async fn execute(&self, input: WorkflowInput) -> Result<WorkflowOutput, WorkflowError> {
        debug!("execute");
        let result = self.next.execute(input).await;
        if let Err(e) = &result {
            warn!(error = %e, "Workflow execution failed");
        }
        result
    }

    fn process_signal(&self, input: SignalInput) {
        debug!(signal_name = %input.signal_name, event_id = input.event_id, "process_signal");
        self.next.process_signal(input);
    }

    fn handle_query(&self, input: HandleQueryInput) -> Result<HandleQueryOutput, WorkflowError> {
        let query_type = input.query_type.clone();
        debug!(%query_type, "handle_query");
        let result = self.next.handle_query(input);
        if let Err(e) = &result {
            warn!(%query_type, error = %e, "Query failed");
        }
        result
    }
}

struct TracingWorkflowOutbound {
    next: Arc<dyn WorkflowOutboundCallsInterceptor>,
}

#[async_trait]
impl WorkflowOutboundCallsInterceptor for TracingWorkflowOutbound {
    fn register_signal_handlers(&self, input: RegisterSignalHandlersInput) -> Result<(), WorkflowError> {
        let names: Vec<String> = input
            .requests()
            .iter()
            .map(|r| r.signal_type().to_string())
            .collect();
        debug!(?names, "register_signal_handlers");
        let result = self.next.register_signal_handlers(input);
        if let Err(e) = &result {
            warn!(error = %e, "Signal handler registration failed");
        }
        result
    }

    fn register_dynamic_signal_handler(
        &self,
        input: RegisterDynamicSignalHandlerInput,
    ) -> Result<(), WorkflowError> {
        debug!("register_dynamic_signal_handler");
        self.next.register_dynamic_signal_handler(input)
    }

    fn register_query(&self, input: RegisterQueryInput) -> Result<(), WorkflowError> {
        debug!(query_type = input.request().query_type(), "register_query");
        self.next.register_query(input)
    }

    async fn execute_activity(&self, input: ActivityInput) -> Result<ActivityOutput, WorkflowError> {
        let activity_type = input.activity_type.clone();
        debug!(%activity_type, "execute_activity");
        let result = self.next.execute_activity(input).await;
        if let Err(e) = &result {
            warn!(%activity_type, error = %e, "Activity failed");
        }
        result
    }

    async fn sleep(&self, duration: Duration) -> Result<(), WorkflowError> {
        debug!(?duration, "sleep");
        self.next.sleep(duration).await
    }

    fn current_time_millis(&self) -> i64 {
        self.next.current_time_millis()
    }
}
