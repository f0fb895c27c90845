//! Client call interceptor contracts.

use std::sync::Arc;

use async_trait::async_trait;

use strand_protocols::ClientError;

use crate::calls::{
    CancelInput, GetResultAsyncOutput, GetResultInput, GetResultOutput, QueryInput, QueryOutput,
    TerminateInput, WorkflowSignalInput, WorkflowSignalWithStartInput,
    WorkflowSignalWithStartOutput, WorkflowStartInput, WorkflowStartOutput,
};

/// Capability set of one layer in the client call chain.
///
/// Decorators hold the next layer and forward every call to it; the
/// innermost layer ([`RootWorkflowClientInvoker`]) issues the RPC. Layers
/// may inspect or log errors but must return them unchanged unless they
/// exist to translate them.
///
/// [`RootWorkflowClientInvoker`]: crate::RootWorkflowClientInvoker
#[async_trait]
pub trait WorkflowClientCallsInterceptor: Send + Sync {
    /// Create a new execution.
    async fn start(&self, input: WorkflowStartInput) -> Result<WorkflowStartOutput, ClientError>;

    /// Deliver a signal. No result payload is defined.
    async fn signal(&self, input: WorkflowSignalInput) -> Result<(), ClientError>;

    /// Start the workflow if needed and deliver a signal in one request.
    async fn signal_with_start(
        &self,
        input: WorkflowSignalWithStartInput,
    ) -> Result<WorkflowSignalWithStartOutput, ClientError>;

    /// Wait for the execution to close, up to the input's timeout.
    async fn get_result(&self, input: GetResultInput) -> Result<GetResultOutput, ClientError>;

    /// Same as [`get_result`](Self::get_result) but returns immediately
    /// with an owned future.
    fn get_result_async(&self, input: GetResultInput) -> GetResultAsyncOutput;

    /// Query the execution. Rejection is reported in the output.
    async fn query(&self, input: QueryInput) -> Result<QueryOutput, ClientError>;

    async fn cancel(&self, input: CancelInput) -> Result<(), ClientError>;

    async fn terminate(&self, input: TerminateInput) -> Result<(), ClientError>;
}

/// Factory adding one layer to the client call chain.
pub trait WorkflowClientInterceptor: Send + Sync {
    fn workflow_client_calls(
        &self,
        next: Arc<dyn WorkflowClientCallsInterceptor>,
    ) -> Arc<dyn WorkflowClientCallsInterceptor>;
}
