//! Logging decorator for the client call chain.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use strand_protocols::ClientError;

use crate::calls::{
    CancelInput, GetResultAsyncOutput, GetResultInput, GetResultOutput, QueryInput, QueryOutput,
    TerminateInput, WorkflowSignalInput, WorkflowSignalWithStartInput,
    WorkflowSignalWithStartOutput, WorkflowStartInput, WorkflowStartOutput,
};
use crate::interceptor::{WorkflowClientCallsInterceptor, WorkflowClientInterceptor};

/// Adds a [`TracingClientCalls`] layer to the chain.
#[derive(Debug, Clone, Default)]
pub struct TracingClientInterceptor;

impl TracingClientInterceptor {
    pub fn new() -> Self {
        Self
    }
}

impl WorkflowClientInterceptor for TracingClientInterceptor {
    fn workflow_client_calls(
        &self,
        next: Arc<dyn WorkflowClientCallsInterceptor>,
    ) -> Arc<dyn WorkflowClientCallsInterceptor> {
        Arc::new(TracingClientCalls { next })
    }
}

/// Logs every call and every failure, then forwards both unchanged.
pub struct TracingClientCalls {
    next: Arc<dyn WorkflowClientCallsInterceptor>,
}

fn log_failure<T>(operation: &'static str, workflow_id: &str, result: &Result<T, ClientError>) {
    if let Err(e) = result {
        warn!(operation, workflow_id, error = %e, "Workflow client call failed");
    }
}

#[async_trait]
impl WorkflowClientCallsInterceptor for TracingClientCalls {
    async fn start(&self, input: WorkflowStartInput) -> Result<WorkflowStartOutput, ClientError> {
        let workflow_id = input.workflow_id().to_string();
        debug!(%workflow_id, workflow_type = input.workflow_type(), "start");
        let result = self.next.start(input).await;
        log_failure("start", &workflow_id, &result);
        result
    }

    async fn signal(&self, input: WorkflowSignalInput) -> Result<(), ClientError> {
        let workflow_id = input.execution().workflow_id.clone();
        debug!(%workflow_id, signal_name = input.signal_name(), "signal");
        let result = self.next.signal(input).await;
        log_failure("signal", &workflow_id, &result);
        result
    }

    async fn signal_with_start(
        &self,
        input: WorkflowSignalWithStartInput,
    ) -> Result<WorkflowSignalWithStartOutput, ClientError> {
        let workflow_id = input.start().workflow_id().to_string();
        debug!(%workflow_id, signal_name = input.signal_name(), "signal_with_start");
        let result = self.next.signal_with_start(input).await;
        log_failure("signal_with_start", &workflow_id, &result);
        result
    }

    async fn get_result(&self, input: GetResultInput) -> Result<GetResultOutput, ClientError> {
        let workflow_id = input.execution().workflow_id.clone();
        debug!(%workflow_id, timeout = ?input.timeout(), "get_result");
        let result = self.next.get_result(input).await;
        log_failure("get_result", &workflow_id, &result);
        result
    }

    fn get_result_async(&self, input: GetResultInput) -> GetResultAsyncOutput {
        let workflow_id = input.execution().workflow_id.clone();
        debug!(%workflow_id, timeout = ?input.timeout(), "get_result_async");
        let inner = self.next.get_result_async(input).result;
        GetResultAsyncOutput::new(Box::pin(async move {
            let result = inner.await;
            log_failure("get_result_async", &workflow_id, &result);
            result
        }))
    }

    async fn query(&self, input: QueryInput) -> Result<QueryOutput, ClientError> {
        let workflow_id = input.execution().workflow_id.clone();
        debug!(%workflow_id, query_type = input.query_type(), "query");
        let result = self.next.query(input).await;
        if let Ok(output) = &result {
            if let Some(status) = output.query_rejected_status() {
                debug!(%workflow_id, ?status, "Query rejected");
            }
        }
        log_failure("query", &workflow_id, &result);
        result
    }

    async fn cancel(&self, input: CancelInput) -> Result<(), ClientError> {
        let workflow_id = input.execution().workflow_id.clone();
        debug!(%workflow_id, reason = ?input.reason(), "cancel");
        let result = self.next.cancel(input).await;
        log_failure("cancel", &workflow_id, &result);
        result
    }

    async fn terminate(&self, input: TerminateInput) -> Result<(), ClientError> {
        let workflow_id = input.execution().workflow_id.clone();
        debug!(%workflow_id, reason = input.reason(), "terminate");
        let result = self.next.terminate(input).await;
        log_failure("terminate", &workflow_id, &result);
        result
    }
}
