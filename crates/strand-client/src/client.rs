//! Typed client facade over the interceptor chain.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use strand_protocols::{
    build_chain, encode, ClientError, JsonPayloadConverter, PayloadConverter, Payloads,
    WorkflowExecution, WorkflowExecutionStatus, WorkflowOptions, WorkflowService,
};

use crate::calls::{
    CancelInput, GetResultInput, QueryInput, TerminateInput, WorkflowSignalInput,
    WorkflowSignalWithStartInput, WorkflowStartInput,
};
use crate::interceptor::{WorkflowClientCallsInterceptor, WorkflowClientInterceptor};
use crate::root::RootWorkflowClientInvoker;

/// Client configuration.
#[derive(Clone)]
pub struct WorkflowClientOptions {
    pub namespace: String,
    pub identity: String,
    /// Interceptors in chain order; the first one is outermost.
    pub interceptors: Vec<Arc<dyn WorkflowClientInterceptor>>,
    pub converter: Arc<dyn PayloadConverter>,
    /// Deadline used by [`WorkflowStub::result`].
    pub result_timeout: Duration,
}

/// Default deadline for [`WorkflowStub::result`].
pub const DEFAULT_RESULT_TIMEOUT: Duration = Duration::from_secs(60);

impl Default for WorkflowClientOptions {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            identity: default_identity(),
            interceptors: Vec::new(),
            converter: Arc::new(JsonPayloadConverter),
            result_timeout: DEFAULT_RESULT_TIMEOUT,
        }
    }
}

fn default_identity() -> String {
    format!("{}@strand-client", std::process::id())
}

impl WorkflowClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn WorkflowClientInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn with_converter(mut self, converter: Arc<dyn PayloadConverter>) -> Self {
        self.converter = converter;
        self
    }

    pub fn with_result_timeout(mut self, timeout: Duration) -> Self {
        self.result_timeout = timeout;
        self
    }
}

impl std::fmt::Debug for WorkflowClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowClientOptions")
            .field("namespace", &self.namespace)
            .field("identity", &self.identity)
            .field("interceptors", &self.interceptors.len())
            .field("result_timeout", &self.result_timeout)
            .finish_non_exhaustive()
    }
}

/// Entry point for application code acting as a workflow client.
#[derive(Clone)]
pub struct WorkflowClient {
    invoker: Arc<dyn WorkflowClientCallsInterceptor>,
    converter: Arc<dyn PayloadConverter>,
    result_timeout: Duration,
}

impl WorkflowClient {
    pub fn new(service: Arc<dyn WorkflowService>, options: WorkflowClientOptions) -> Self {
        let root: Arc<dyn WorkflowClientCallsInterceptor> = Arc::new(
            RootWorkflowClientInvoker::new(service, options.namespace, options.identity),
        );
        let invoker = build_chain(
            root,
            options.interceptors.iter().map(|interceptor| {
                move |next: Arc<dyn WorkflowClientCallsInterceptor>| {
                    interceptor.workflow_client_calls(next)
                }
            }),
        );
        Self {
            invoker,
            converter: options.converter,
            result_timeout: options.result_timeout,
        }
    }

    /// Outermost layer of the call chain.
    pub fn invoker(&self) -> &Arc<dyn WorkflowClientCallsInterceptor> {
        &self.invoker
    }

    pub fn converter(&self) -> &Arc<dyn PayloadConverter> {
        &self.converter
    }

    pub fn result_timeout(&self) -> Duration {
        self.result_timeout
    }

    /// Stub for a workflow that this stub will start.
    pub fn new_workflow_stub(
        &self,
        workflow_id: impl Into<String>,
        workflow_type: impl Into<String>,
        options: WorkflowOptions,
    ) -> WorkflowStub {
        WorkflowStub {
            invoker: self.invoker.clone(),
            converter: self.converter.clone(),
            result_timeout: self.result_timeout,
            workflow_id: workflow_id.into(),
            workflow_type: Some(workflow_type.into()),
            options: Some(options),
            execution: Mutex::new(None),
        }
    }

    /// Stub bound to an existing execution. Such a stub cannot start.
    pub fn workflow_stub(&self, execution: WorkflowExecution) -> WorkflowStub {
        WorkflowStub {
            invoker: self.invoker.clone(),
            converter: self.converter.clone(),
            result_timeout: self.result_timeout,
            workflow_id: execution.workflow_id.clone(),
            workflow_type: None,
            options: None,
            execution: Mutex::new(Some(execution)),
        }
    }
}

/// Decoded outcome of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult<R> {
    Answered(R),
    /// The workflow was not in a queryable state.
    Rejected(WorkflowExecutionStatus),
}

impl<R> QueryResult<R> {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn answered(self) -> Option<R> {
        match self {
            Self::Answered(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }
}

/// Untyped handle to one workflow, encoding arguments and decoding results.
pub struct WorkflowStub {
    invoker: Arc<dyn WorkflowClientCallsInterceptor>,
    converter: Arc<dyn PayloadConverter>,
    result_timeout: Duration,
    workflow_id: String,
    workflow_type: Option<String>,
    options: Option<WorkflowOptions>,
    execution: Mutex<Option<WorkflowExecution>>,
}

impl WorkflowStub {
    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    /// The started execution, or the latest run of the workflow id.
    pub fn execution(&self) -> WorkflowExecution {
        self.execution
            .lock()
            .clone()
            .unwrap_or_else(|| WorkflowExecution::latest(self.workflow_id.clone()))
    }

    fn encode<A: Serialize + ?Sized>(&self, args: &A) -> Result<Payloads, ClientError> {
        Ok(Payloads::single(encode(self.converter.as_ref(), args)?))
    }

    fn start_input<A: Serialize + ?Sized>(&self, args: &A) -> Result<WorkflowStartInput, ClientError> {
        let mut builder = WorkflowStartInput::builder()
            .workflow_id(self.workflow_id.clone())
            .arguments(self.encode(args)?);
        if let Some(workflow_type) = &self.workflow_type {
            builder = builder.workflow_type(workflow_type.clone());
        }
        if let Some(options) = &self.options {
            builder = builder.options(options.clone());
        }
        Ok(builder.build()?)
    }

    fn result_input(&self, timeout: Duration) -> Result<GetResultInput, ClientError> {
        Ok(GetResultInput::new(
            self.execution(),
            self.workflow_type.clone(),
            timeout,
        )?)
    }

    pub async fn start<A: Serialize + ?Sized>(&self, args: &A) -> Result<WorkflowExecution, ClientError> {
        let input = self.start_input(args)?;
        let output = self.invoker.start(input).await?;
        *self.execution.lock() = Some(output.execution.clone());
        Ok(output.execution)
    }

    pub async fn signal<A: Serialize + ?Sized>(
        &self,
        signal_name: &str,
        args: &A,
    ) -> Result<(), ClientError> {
        let input = WorkflowSignalInput::new(self.execution(), signal_name, Some(self.encode(args)?))?;
        self.invoker.signal(input).await
    }

    pub async fn signal_with_start<S, A>(
        &self,
        signal_name: &str,
        signal_args: &S,
        start_args: &A,
    ) -> Result<WorkflowExecution, ClientError>
    where
        S: Serialize + ?Sized,
        A: Serialize + ?Sized,
    {
        let input = WorkflowSignalWithStartInput::new(
            self.start_input(start_args)?,
            signal_name,
            Some(self.encode(signal_args)?),
        )?;
        let output = self.invoker.signal_with_start(input).await?;
        let execution = output.start_output.execution;
        *self.execution.lock() = Some(execution.clone());
        Ok(execution)
    }

    /// Wait for the workflow result using the client's configured deadline.
    pub async fn result<R: DeserializeOwned>(&self) -> Result<R, ClientError> {
        self.get_result(self.result_timeout).await
    }

    /// Wait up to `timeout` for the workflow result.
    pub async fn get_result<R: DeserializeOwned>(&self, timeout: Duration) -> Result<R, ClientError> {
        let output = self.invoker.get_result(self.result_input(timeout)?).await?;
        Ok(output.decode(self.converter.as_ref())?)
    }

    /// Owned future resolving to the workflow result, suitable for spawning.
    pub fn get_result_async<R>(
        &self,
        timeout: Duration,
    ) -> Result<BoxFuture<'static, Result<R, ClientError>>, ClientError>
    where
        R: DeserializeOwned + Send + 'static,
    {
        let handle = self.invoker.get_result_async(self.result_input(timeout)?);
        let converter = self.converter.clone();
        Ok(Box::pin(async move {
            let output = handle.result.await?;
            Ok(output.decode(converter.as_ref())?)
        }))
    }

    pub async fn query<R, A>(&self, query_type: &str, args: &A) -> Result<QueryResult<R>, ClientError>
    where
        R: DeserializeOwned,
        A: Serialize + ?Sized,
    {
        let input = QueryInput::new(self.execution(), query_type, Some(self.encode(args)?))?;
        let output = self.invoker.query(input).await?;
        if let Some(status) = output.query_rejected_status() {
            return Ok(QueryResult::Rejected(status));
        }
        let value = strand_protocols::decode_arguments(self.converter.as_ref(), output.result())?;
        Ok(QueryResult::Answered(value))
    }

    pub async fn cancel(&self, reason: Option<&str>) -> Result<(), ClientError> {
        let input = CancelInput::new(self.execution(), reason.map(str::to_string))?;
        self.invoker.cancel(input).await
    }

    pub async fn terminate(&self, reason: &str) -> Result<(), ClientError> {
        let input = TerminateInput::new(self.execution(), reason, None)?;
        self.invoker.terminate(input).await
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
