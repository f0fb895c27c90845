//! Input and output values crossing the client call boundary.
//!
//! Inputs validate their identity fields when constructed and are
//! immutable afterwards. Outputs are plain data.

use std::time::Duration;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;

use strand_protocols::{
    decode_arguments, ClientError, DataConversionError, Header, InvalidArgumentError,
    PayloadConverter, Payloads, WorkflowExecution, WorkflowExecutionStatus, WorkflowOptions,
};

/// Input of a workflow start.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowStartInput {
    workflow_id: String,
    workflow_type: String,
    header: Header,
    arguments: Option<Payloads>,
    options: WorkflowOptions,
}

impl WorkflowStartInput {
    /// Create a start input, failing if the id or type is blank.
    pub fn new(
        workflow_id: impl Into<String>,
        workflow_type: impl Into<String>,
        header: Header,
        arguments: Option<Payloads>,
        options: WorkflowOptions,
    ) -> Result<Self, InvalidArgumentError> {
        let workflow_id = workflow_id.into();
        let workflow_type = workflow_type.into();
        InvalidArgumentError::require_non_empty("workflow_id", &workflow_id)?;
        InvalidArgumentError::require_non_empty("workflow_type", &workflow_type)?;
        Ok(Self {
            workflow_id,
            workflow_type,
            header,
            arguments,
            options,
        })
    }

    pub fn builder() -> WorkflowStartInputBuilder {
        WorkflowStartInputBuilder::default()
    }

    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    pub fn workflow_type(&self) -> &str {
        &self.workflow_type
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn arguments(&self) -> Option<&Payloads> {
        self.arguments.as_ref()
    }

    pub fn options(&self) -> &WorkflowOptions {
        &self.options
    }

    /// Copy of this input with a different header, for interceptors that
    /// propagate context.
    pub fn with_header(&self, header: Header) -> Self {
        Self {
            header,
            ..self.clone()
        }
    }
}

/// Builder for [`WorkflowStartInput`].
///
/// `workflow_id`, `workflow_type` and `options` are mandatory; leaving any
/// of them unset makes [`build`](Self::build) fail.
#[derive(Debug, Default)]
pub struct WorkflowStartInputBuilder {
    workflow_id: Option<String>,
    workflow_type: Option<String>,
    header: Header,
    arguments: Option<Payloads>,
    options: Option<WorkflowOptions>,
}

impl WorkflowStartInputBuilder {
    pub fn workflow_id(mut self, workflow_id: impl Into<String>) -> Self {
        self.workflow_id = Some(workflow_id.into());
        self
    }

    pub fn workflow_type(mut self, workflow_type: impl Into<String>) -> Self {
        self.workflow_type = Some(workflow_type.into());
        self
    }

    pub fn header(mut self, header: Header) -> Self {
        self.header = header;
        self
    }

    pub fn arguments(mut self, arguments: Payloads) -> Self {
        self.arguments = Some(arguments);
        self
    }

    pub fn options(mut self, options: WorkflowOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn build(self) -> Result<WorkflowStartInput, InvalidArgumentError> {
        let workflow_id = self
            .workflow_id
            .ok_or_else(|| InvalidArgumentError::required("workflow_id"))?;
        let workflow_type = self
            .workflow_type
            .ok_or_else(|| InvalidArgumentError::required("workflow_type"))?;
        let options = self
            .options
            .ok_or_else(|| InvalidArgumentError::required("options"))?;
        WorkflowStartInput::new(workflow_id, workflow_type, self.header, self.arguments, options)
    }
}

/// Output of a workflow start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowStartOutput {
    pub execution: WorkflowExecution,
}

/// Input of a signal delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSignalInput {
    execution: WorkflowExecution,
    signal_name: String,
    arguments: Option<Payloads>,
    header: Header,
}

impl WorkflowSignalInput {
    pub fn new(
        execution: WorkflowExecution,
        signal_name: impl Into<String>,
        arguments: Option<Payloads>,
    ) -> Result<Self, InvalidArgumentError> {
        let signal_name = signal_name.into();
        InvalidArgumentError::require_non_empty("workflow_id", &execution.workflow_id)?;
        InvalidArgumentError::require_non_empty("signal_name", &signal_name)?;
        Ok(Self {
            execution,
            signal_name,
            arguments,
            header: Header::empty(),
        })
    }

    pub fn with_header(mut self, header: Header) -> Self {
        self.header = header;
        self
    }

    pub fn execution(&self) -> &WorkflowExecution {
        &self.execution
    }

    pub fn signal_name(&self) -> &str {
        &self.signal_name
    }

    pub fn arguments(&self) -> Option<&Payloads> {
        self.arguments.as_ref()
    }

    pub fn header(&self) -> &Header {
        &self.header
    }
}

/// Start input and signal delivered atomically by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSignalWithStartInput {
    start: WorkflowStartInput,
    signal_name: String,
    signal_arguments: Option<Payloads>,
}

impl WorkflowSignalWithStartInput {
    pub fn new(
        start: WorkflowStartInput,
        signal_name: impl Into<String>,
        signal_arguments: Option<Payloads>,
    ) -> Result<Self, InvalidArgumentError> {
        let signal_name = signal_name.into();
        InvalidArgumentError::require_non_empty("signal_name", &signal_name)?;
        Ok(Self {
            start,
            signal_name,
            signal_arguments,
        })
    }

    pub fn start(&self) -> &WorkflowStartInput {
        &self.start
    }

    pub fn signal_name(&self) -> &str {
        &self.signal_name
    }

    pub fn signal_arguments(&self) -> Option<&Payloads> {
        self.signal_arguments.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSignalWithStartOutput {
    pub start_output: WorkflowStartOutput,
}

/// Input of a result retrieval, bounded by `timeout`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetResultInput {
    execution: WorkflowExecution,
    workflow_type: Option<String>,
    timeout: Duration,
}

impl GetResultInput {
    pub fn new(
        execution: WorkflowExecution,
        workflow_type: Option<String>,
        timeout: Duration,
    ) -> Result<Self, InvalidArgumentError> {
        InvalidArgumentError::require_non_empty("workflow_id", &execution.workflow_id)?;
        Ok(Self {
            execution,
            workflow_type,
            timeout,
        })
    }

    pub fn execution(&self) -> &WorkflowExecution {
        &self.execution
    }

    pub fn workflow_type(&self) -> Option<&str> {
        self.workflow_type.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Result of a completed workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct GetResultOutput {
    pub result: Option<Payloads>,
}

impl GetResultOutput {
    /// Decode the result into the expected shape.
    pub fn decode<R: DeserializeOwned>(
        &self,
        converter: &dyn PayloadConverter,
    ) -> Result<R, DataConversionError> {
        decode_arguments(converter, self.result.as_ref())
    }
}

/// Owned future resolving to a workflow result.
pub type WorkflowResultFuture = BoxFuture<'static, Result<GetResultOutput, ClientError>>;

/// Handle returned by a non-blocking result retrieval.
pub struct GetResultAsyncOutput {
    pub result: WorkflowResultFuture,
}

impl GetResultAsyncOutput {
    pub fn new(result: WorkflowResultFuture) -> Self {
        Self { result }
    }
}

impl std::fmt::Debug for GetResultAsyncOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GetResultAsyncOutput").finish_non_exhaustive()
    }
}

/// Input of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryInput {
    execution: WorkflowExecution,
    query_type: String,
    arguments: Option<Payloads>,
    header: Header,
}

impl QueryInput {
    pub fn new(
        execution: WorkflowExecution,
        query_type: impl Into<String>,
        arguments: Option<Payloads>,
    ) -> Result<Self, InvalidArgumentError> {
        let query_type = query_type.into();
        InvalidArgumentError::require_non_empty("workflow_id", &execution.workflow_id)?;
        InvalidArgumentError::require_non_empty("query_type", &query_type)?;
        Ok(Self {
            execution,
            query_type,
            arguments,
            header: Header::empty(),
        })
    }

    pub fn with_header(mut self, header: Header) -> Self {
        self.header = header;
        self
    }

    pub fn execution(&self) -> &WorkflowExecution {
        &self.execution
    }

    pub fn query_type(&self) -> &str {
        &self.query_type
    }

    pub fn arguments(&self) -> Option<&Payloads> {
        self.arguments.as_ref()
    }

    pub fn header(&self) -> &Header {
        &self.header
    }
}

/// Output of a query. A rejected query carries a status and no result.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    result: Option<Payloads>,
    rejected_status: Option<WorkflowExecutionStatus>,
}

impl QueryOutput {
    pub fn answered(result: Option<Payloads>) -> Self {
        Self {
            result,
            rejected_status: None,
        }
    }

    pub fn rejected(status: WorkflowExecutionStatus) -> Self {
        Self {
            result: None,
            rejected_status: Some(status),
        }
    }

    pub fn is_query_rejected(&self) -> bool {
        self.rejected_status.is_some()
    }

    /// Status of the workflow when the query was rejected.
    pub fn query_rejected_status(&self) -> Option<WorkflowExecutionStatus> {
        self.rejected_status
    }

    /// The query result; always `None` for a rejected query.
    pub fn result(&self) -> Option<&Payloads> {
        if self.is_query_rejected() {
            return None;
        }
        self.result.as_ref()
    }
}

/// Input of a cancellation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelInput {
    execution: WorkflowExecution,
    reason: Option<String>,
}

impl CancelInput {
    pub fn new(
        execution: WorkflowExecution,
        reason: Option<String>,
    ) -> Result<Self, InvalidArgumentError> {
        InvalidArgumentError::require_non_empty("workflow_id", &execution.workflow_id)?;
        Ok(Self { execution, reason })
    }

    pub fn execution(&self) -> &WorkflowExecution {
        &self.execution
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

/// Input of a forced termination.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminateInput {
    execution: WorkflowExecution,
    reason: String,
    details: Option<Payloads>,
}

impl TerminateInput {
    pub fn new(
        execution: WorkflowExecution,
        reason: impl Into<String>,
        details: Option<Payloads>,
    ) -> Result<Self, InvalidArgumentError> {
        InvalidArgumentError::require_non_empty("workflow_id", &execution.workflow_id)?;
        Ok(Self {
            execution,
            reason: reason.into(),
            details,
        })
    }

    pub fn execution(&self) -> &WorkflowExecution {
        &self.execution
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn details(&self) -> Option<&Payloads> {
        self.details.as_ref()
    }
}

#[cfg(test)]
#[path = "calls_tests.rs"]
mod tests;
