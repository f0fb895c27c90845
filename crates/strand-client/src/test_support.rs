//! In-memory orchestration service used by the client tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use strand_protocols::service::{
    GetWorkflowCloseEventRequest, GetWorkflowCloseEventResponse, QueryWorkflowRequest,
    QueryWorkflowResponse, RequestCancelWorkflowExecutionRequest,
    SignalWithStartWorkflowExecutionRequest, SignalWorkflowExecutionRequest,
    StartWorkflowExecutionRequest, StartWorkflowExecutionResponse,
    TerminateWorkflowExecutionRequest, WorkflowCloseEvent,
};
use strand_protocols::{Payloads, ServiceError, WorkflowIdReusePolicy, WorkflowService};

/// Length of one simulated long poll.
pub const POLL_WINDOW: Duration = Duration::from_millis(5);

#[derive(Debug, Clone)]
pub struct FakeExecution {
    pub run_id: String,
    pub workflow_type: String,
    pub running: bool,
    pub signals: Vec<(String, Option<Payloads>)>,
}

#[derive(Default)]
pub struct FakeWorkflowService {
    pub executions: Mutex<HashMap<String, FakeExecution>>,
    pub close_events: Mutex<HashMap<String, VecDeque<Result<Option<WorkflowCloseEvent>, ServiceError>>>>,
    pub polled_runs: Mutex<Vec<Option<String>>>,
    pub query_response: Mutex<Option<QueryWorkflowResponse>>,
    pub queries: Mutex<Vec<QueryWorkflowRequest>>,
    pub cancels: Mutex<Vec<RequestCancelWorkflowExecutionRequest>>,
    pub terminations: Mutex<Vec<TerminateWorkflowExecutionRequest>>,
    pub starts: Mutex<Vec<StartWorkflowExecutionRequest>>,
    pub unavailable: AtomicBool,
    next_run: AtomicU32,
}

impl FakeWorkflowService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a poll outcome for `workflow_id`.
    pub fn push_close_event(
        &self,
        workflow_id: &str,
        outcome: Result<Option<WorkflowCloseEvent>, ServiceError>,
    ) {
        self.close_events
            .lock()
            .entry(workflow_id.to_string())
            .or_default()
            .push_back(outcome);
    }

    pub fn signals_for(&self, workflow_id: &str) -> Vec<(String, Option<Payloads>)> {
        self.executions
            .lock()
            .get(workflow_id)
            .map(|e| e.signals.clone())
            .unwrap_or_default()
    }

    fn check_available(&self) -> Result<(), ServiceError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    fn do_start(&self, request: &StartWorkflowExecutionRequest) -> Result<String, ServiceError> {
        let mut executions = self.executions.lock();
        if let Some(existing) = executions.get(&request.workflow_id) {
            let rejected = existing.running
                || request.options.id_reuse_policy == WorkflowIdReusePolicy::RejectDuplicate;
            if rejected {
                return Err(ServiceError::AlreadyStarted {
                    workflow_id: request.workflow_id.clone(),
                    run_id: existing.run_id.clone(),
                });
            }
        }
        let run_id = format!("run-{}", self.next_run.fetch_add(1, Ordering::SeqCst) + 1);
        executions.insert(
            request.workflow_id.clone(),
            FakeExecution {
                run_id: run_id.clone(),
                workflow_type: request.workflow_type.clone(),
                running: true,
                signals: Vec::new(),
            },
        );
        self.starts.lock().push(request.clone());
        Ok(run_id)
    }
}

#[async_trait]
impl WorkflowService for FakeWorkflowService {
    async fn start_workflow_execution(
        &self,
        request: StartWorkflowExecutionRequest,
    ) -> Result<StartWorkflowExecutionResponse, ServiceError> {
        self.check_available()?;
        let run_id = self.do_start(&request)?;
        Ok(StartWorkflowExecutionResponse { run_id })
    }

    async fn signal_workflow_execution(
        &self,
        request: SignalWorkflowExecutionRequest,
    ) -> Result<(), ServiceError> {
        self.check_available()?;
        let mut executions = self.executions.lock();
        let execution = executions
            .get_mut(&request.execution.workflow_id)
            .filter(|e| e.running)
            .ok_or_else(|| ServiceError::NotFound(request.execution.workflow_id.clone()))?;
        execution.signals.push((request.signal_name, request.input));
        Ok(())
    }

    async fn signal_with_start_workflow_execution(
        &self,
        request: SignalWithStartWorkflowExecutionRequest,
    ) -> Result<StartWorkflowExecutionResponse, ServiceError> {
        self.check_available()?;
        let workflow_id = request.start.workflow_id.clone();
        let running = self
            .executions
            .lock()
            .get(&workflow_id)
            .is_some_and(|e| e.running);
        if !running {
            self.do_start(&request.start)?;
        }
        let mut executions = self.executions.lock();
        let execution = executions
            .get_mut(&workflow_id)
            .ok_or_else(|| ServiceError::Internal("execution vanished".to_string()))?;
        execution.signals.push((request.signal_name, request.signal_input));
        Ok(StartWorkflowExecutionResponse {
            run_id: execution.run_id.clone(),
        })
    }

    async fn get_workflow_close_event(
        &self,
        request: GetWorkflowCloseEventRequest,
    ) -> Result<GetWorkflowCloseEventResponse, ServiceError> {
        self.check_available()?;
        self.polled_runs.lock().push(request.execution.run_id.clone());
        let scripted = self
            .close_events
            .lock()
            .get_mut(&request.execution.workflow_id)
            .and_then(VecDeque::pop_front);
        match scripted {
            Some(outcome) => outcome.map(|close_event| GetWorkflowCloseEventResponse { close_event }),
            None => {
                tokio::time::sleep(POLL_WINDOW).await;
                Ok(GetWorkflowCloseEventResponse { close_event: None })
            }
        }
    }

    async fn query_workflow(
        &self,
        request: QueryWorkflowRequest,
    ) -> Result<QueryWorkflowResponse, ServiceError> {
        self.check_available()?;
        self.queries.lock().push(request);
        self.query_response
            .lock()
            .clone()
            .ok_or_else(|| ServiceError::Internal("no query response scripted".to_string()))
    }

    async fn request_cancel_workflow_execution(
        &self,
        request: RequestCancelWorkflowExecutionRequest,
    ) -> Result<(), ServiceError> {
        self.check_available()?;
        self.cancels.lock().push(request);
        Ok(())
    }

    async fn terminate_workflow_execution(
        &self,
        request: TerminateWorkflowExecutionRequest,
    ) -> Result<(), ServiceError> {
        self.check_available()?;
        if let Some(execution) = self.executions.lock().get_mut(&request.execution.workflow_id) {
            execution.running = false;
        }
        self.terminations.lock().push(request);
        Ok(())
    }
}
