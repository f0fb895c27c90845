//! Terminal layer of the client call chain.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use strand_protocols::service::{
    GetWorkflowCloseEventRequest, QueryWorkflowRequest, RequestCancelWorkflowExecutionRequest,
    SignalWithStartWorkflowExecutionRequest, SignalWorkflowExecutionRequest,
    StartWorkflowExecutionRequest, TerminateWorkflowExecutionRequest, WorkflowCloseEvent,
};
use strand_protocols::{ClientError, ServiceError, WorkflowExecution, WorkflowService};

use crate::calls::{
    CancelInput, GetResultAsyncOutput, GetResultInput, GetResultOutput, QueryInput, QueryOutput,
    TerminateInput, WorkflowSignalInput, WorkflowSignalWithStartInput,
    WorkflowSignalWithStartOutput, WorkflowStartInput, WorkflowStartOutput,
};
use crate::interceptor::WorkflowClientCallsInterceptor;

/// Issues every client call as an RPC against a [`WorkflowService`].
pub struct RootWorkflowClientInvoker {
    service: Arc<dyn WorkflowService>,
    namespace: String,
    identity: String,
}

impl RootWorkflowClientInvoker {
    pub fn new(
        service: Arc<dyn WorkflowService>,
        namespace: impl Into<String>,
        identity: impl Into<String>,
    ) -> Self {
        Self {
            service,
            namespace: namespace.into(),
            identity: identity.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn start_request(&self, input: &WorkflowStartInput) -> StartWorkflowExecutionRequest {
        StartWorkflowExecutionRequest {
            namespace: self.namespace.clone(),
            workflow_id: input.workflow_id().to_string(),
            workflow_type: input.workflow_type().to_string(),
            options: input.options().clone(),
            input: input.arguments().cloned(),
            header: input.header().clone(),
            identity: self.identity.clone(),
            request_id: new_request_id(),
        }
    }
}

fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// First pause after an empty poll that did not wait; doubles up to the cap.
const EMPTY_POLL_BASE_DELAY: Duration = Duration::from_millis(10);
const EMPTY_POLL_MAX_DELAY: Duration = Duration::from_secs(1);

fn empty_poll_delay(consecutive: u32) -> Duration {
    EMPTY_POLL_BASE_DELAY
        .saturating_mul(1 << consecutive.min(7))
        .min(EMPTY_POLL_MAX_DELAY)
}

/// Wait for the close event of `input`'s execution, bounded by its timeout.
async fn wait_for_result(
    service: Arc<dyn WorkflowService>,
    namespace: String,
    input: GetResultInput,
) -> Result<GetResultOutput, ClientError> {
    let timeout = input.timeout();
    // Tracks continued-as-new runs so a timeout reports the run being awaited.
    let current = Mutex::new(input.execution().clone());
    match tokio::time::timeout(timeout, poll_close_event(service, namespace, &current)).await {
        Ok(result) => result,
        Err(_) => {
            let execution = current.lock().clone();
            Err(ClientError::Timeout {
                workflow_id: execution.workflow_id,
                run_id: execution.run_id,
                timeout,
            })
        }
    }
}

async fn poll_close_event(
    service: Arc<dyn WorkflowService>,
    namespace: String,
    current: &Mutex<WorkflowExecution>,
) -> Result<GetResultOutput, ClientError> {
    let mut empty_polls = 0u32;
    loop {
        let execution = current.lock().clone();
        let request = GetWorkflowCloseEventRequest {
            namespace: namespace.clone(),
            execution: execution.clone(),
        };
        let polled_at = Instant::now();
        let close_event = match service.get_workflow_close_event(request).await {
            Ok(response) => response.close_event,
            // A single long poll expiring is not a failure of the whole wait.
            Err(ServiceError::DeadlineExceeded(message)) => {
                debug!(workflow_id = %execution.workflow_id, %message, "Long poll expired, polling again");
                None
            }
            Err(e) => return Err(e.into()),
        };

        let Some(event) = close_event else {
            if polled_at.elapsed() < EMPTY_POLL_BASE_DELAY {
                tokio::time::sleep(empty_poll_delay(empty_polls)).await;
                empty_polls = empty_polls.saturating_add(1);
            } else {
                empty_polls = 0;
            }
            continue;
        };

        let workflow_id = execution.workflow_id;
        match event {
            WorkflowCloseEvent::Completed { result } => return Ok(GetResultOutput { result }),
            WorkflowCloseEvent::Failed { message } => {
                return Err(ClientError::WorkflowFailed {
                    workflow_id,
                    message,
                });
            }
            WorkflowCloseEvent::Canceled { .. } => {
                return Err(ClientError::WorkflowCanceled { workflow_id });
            }
            WorkflowCloseEvent::Terminated { reason } => {
                return Err(ClientError::WorkflowTerminated {
                    workflow_id,
                    reason,
                });
            }
            WorkflowCloseEvent::TimedOut => {
                return Err(ClientError::WorkflowTimedOut { workflow_id });
            }
            WorkflowCloseEvent::ContinuedAsNew { new_run_id } => {
                debug!(%workflow_id, %new_run_id, "Following continued-as-new run");
                current.lock().run_id = Some(new_run_id);
            }
        }
    }
}

#[async_trait]
impl WorkflowClientCallsInterceptor for RootWorkflowClientInvoker {
    async fn start(&self, input: WorkflowStartInput) -> Result<WorkflowStartOutput, ClientError> {
        let request = self.start_request(&input);
        let response = self.service.start_workflow_execution(request).await?;
        Ok(WorkflowStartOutput {
            execution: WorkflowExecution::new(input.workflow_id(), response.run_id),
        })
    }

    async fn signal(&self, input: WorkflowSignalInput) -> Result<(), ClientError> {
        let request = SignalWorkflowExecutionRequest {
            namespace: self.namespace.clone(),
            execution: input.execution().clone(),
            signal_name: input.signal_name().to_string(),
            input: input.arguments().cloned(),
            header: input.header().clone(),
            identity: self.identity.clone(),
            request_id: new_request_id(),
        };
        self.service.signal_workflow_execution(request).await?;
        Ok(())
    }

    async fn signal_with_start(
        &self,
        input: WorkflowSignalWithStartInput,
    ) -> Result<WorkflowSignalWithStartOutput, ClientError> {
        let request = SignalWithStartWorkflowExecutionRequest {
            start: self.start_request(input.start()),
            signal_name: input.signal_name().to_string(),
            signal_input: input.signal_arguments().cloned(),
        };
        let response = self.service.signal_with_start_workflow_execution(request).await?;
        Ok(WorkflowSignalWithStartOutput {
            start_output: WorkflowStartOutput {
                execution: WorkflowExecution::new(input.start().workflow_id(), response.run_id),
            },
        })
    }

    async fn get_result(&self, input: GetResultInput) -> Result<GetResultOutput, ClientError> {
        wait_for_result(self.service.clone(), self.namespace.clone(), input).await
    }

    fn get_result_async(&self, input: GetResultInput) -> GetResultAsyncOutput {
        let service = self.service.clone();
        let namespace = self.namespace.clone();
        GetResultAsyncOutput::new(Box::pin(wait_for_result(service, namespace, input)))
    }

    async fn query(&self, input: QueryInput) -> Result<QueryOutput, ClientError> {
        let request = QueryWorkflowRequest {
            namespace: self.namespace.clone(),
            execution: input.execution().clone(),
            query_type: input.query_type().to_string(),
            query_args: input.arguments().cloned(),
            header: input.header().clone(),
        };
        let response = self.service.query_workflow(request).await?;
        Ok(match response.query_rejected {
            Some(status) => QueryOutput::rejected(status),
            None => QueryOutput::answered(response.query_result),
        })
    }

    async fn cancel(&self, input: CancelInput) -> Result<(), ClientError> {
        let request = RequestCancelWorkflowExecutionRequest {
            namespace: self.namespace.clone(),
            execution: input.execution().clone(),
            reason: input.reason().map(str::to_string),
            identity: self.identity.clone(),
            request_id: new_request_id(),
        };
        self.service.request_cancel_workflow_execution(request).await?;
        Ok(())
    }

    async fn terminate(&self, input: TerminateInput) -> Result<(), ClientError> {
        let request = TerminateWorkflowExecutionRequest {
            namespace: self.namespace.clone(),
            execution: input.execution().clone(),
            reason: input.reason().to_string(),
            details: input.details().cloned(),
            identity: self.identity.clone(),
        };
        self.service.terminate_workflow_execution(request).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "root_tests.rs"]
mod tests;
