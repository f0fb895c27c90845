//! Terminal inbound layer calling into the workflow definition.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;

use strand_protocols::{EncodedValues, PayloadConverter, WorkflowError};

use crate::context::WorkflowContext;
use crate::inbound::{
    HandleQueryInput, HandleQueryOutput, SignalInput, WorkflowInboundCallsInterceptor,
    WorkflowInput, WorkflowOutput,
};
use crate::outbound::WorkflowOutboundCallsInterceptor;
use crate::query_dispatcher::QueryDispatcher;
use crate::signal_dispatcher::SignalDispatcher;
use crate::workflow::WorkflowDefinition;

pub struct RootWorkflowInbound {
    workflow: Arc<dyn WorkflowDefinition>,
    signals: Arc<SignalDispatcher>,
    queries: Arc<QueryDispatcher>,
    converter: Arc<dyn PayloadConverter>,
    init_attempted: AtomicBool,
    /// Set only once the workflow's own `init` succeeded.
    context: OnceLock<WorkflowContext>,
}

impl RootWorkflowInbound {
    pub fn new(
        workflow: Arc<dyn WorkflowDefinition>,
        signals: Arc<SignalDispatcher>,
        queries: Arc<QueryDispatcher>,
        converter: Arc<dyn PayloadConverter>,
    ) -> Self {
        Self {
            workflow,
            signals,
            queries,
            converter,
            init_attempted: AtomicBool::new(false),
            context: OnceLock::new(),
        }
    }
}

#[async_trait]
impl WorkflowInboundCallsInterceptor for RootWorkflowInbound {
    fn init(&self, outbound: Arc<dyn WorkflowOutboundCallsInterceptor>) -> Result<(), WorkflowError> {
        let already_initialized = || {
            WorkflowError::illegal_state(format!(
                "Workflow {} is already initialized",
                self.workflow.workflow_type()
            ))
        };
        if self.init_attempted.swap(true, Ordering::SeqCst) {
            return Err(already_initialized());
        }
        let ctx = WorkflowContext::new(outbound, self.converter.clone());
        self.workflow.init(&ctx)?;
        self.context.set(ctx).map_err(|_| already_initialized())
    }

    async fn execute(&self, input: WorkflowInput) -> Result<WorkflowOutput, WorkflowError> {
        let ctx = self.context.get().cloned().ok_or_else(|| {
            let reason = if self.init_attempted.load(Ordering::SeqCst) {
                "after a failed init"
            } else {
                "before init"
            };
            WorkflowError::illegal_state(format!(
                "Workflow {} executed {}",
                self.workflow.workflow_type(),
                reason
            ))
        })?;
        let args = EncodedValues::new(input.arguments, self.converter.clone());
        let result = self.workflow.execute(ctx, args).await?;
        Ok(WorkflowOutput { result })
    }

    fn process_signal(&self, input: SignalInput) {
        self.signals
            .signal(&input.signal_name, input.arguments, input.event_id);
    }

    fn handle_query(&self, input: HandleQueryInput) -> Result<HandleQueryOutput, WorkflowError> {
        let result = self
            .queries
            .handle(&input.query_type, input.arguments.as_ref())?;
        Ok(HandleQueryOutput { result })
    }
}
