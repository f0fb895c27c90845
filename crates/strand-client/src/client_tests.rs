use super::*;

use async_trait::async_trait;
use serde::Deserialize;

use strand_protocols::service::{QueryWorkflowResponse, WorkflowCloseEvent};
use strand_protocols::{ServiceError, WorkflowIdReusePolicy};

use crate::calls::{
    GetResultAsyncOutput, GetResultOutput, QueryOutput, WorkflowSignalWithStartOutput,
    WorkflowStartOutput,
};
use crate::test_support::FakeWorkflowService;
use crate::tracing_interceptor::TracingClientInterceptor;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Order {
    id: u32,
    items: Vec<String>,
}

fn client_with(
    service: Arc<FakeWorkflowService>,
    interceptors: Vec<Arc<dyn WorkflowClientInterceptor>>,
) -> WorkflowClient {
    let mut options = WorkflowClientOptions::new()
        .with_namespace("orders")
        .with_identity("client-test");
    for interceptor in interceptors {
        options = options.with_interceptor(interceptor);
    }
    WorkflowClient::new(service, options)
}

/// Records the name of every call it sees, in order, into a shared log.
struct Recording {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl WorkflowClientInterceptor for Recording {
    fn workflow_client_calls(
        &self,
        next: Arc<dyn WorkflowClientCallsInterceptor>,
    ) -> Arc<dyn WorkflowClientCallsInterceptor> {
        Arc::new(RecordingCalls {
            name: self.name,
            log: self.log.clone(),
            next,
        })
    }
}

struct RecordingCalls {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
    next: Arc<dyn WorkflowClientCallsInterceptor>,
}

impl RecordingCalls {
    fn record(&self, call: &str) {
        self.log.lock().push(format!("{}:{}", self.name, call));
    }
}

#[async_trait]
impl WorkflowClientCallsInterceptor for RecordingCalls {
    async fn start(&self, input: WorkflowStartInput) -> Result<WorkflowStartOutput, ClientError> {
        self.record("start");
        self.next.start(input).await
    }

    async fn signal(&self, input: WorkflowSignalInput) -> Result<(), ClientError> {
        self.record("signal");
        self.next.signal(input).await
    }

    async fn signal_with_start(
        &self,
        input: WorkflowSignalWithStartInput,
    ) -> Result<WorkflowSignalWithStartOutput, ClientError> {
        self.record("signal_with_start");
        self.next.signal_with_start(input).await
    }

    async fn get_result(&self, input: GetResultInput) -> Result<GetResultOutput, ClientError> {
        self.record("get_result");
        self.next.get_result(input).await
    }

    fn get_result_async(&self, input: GetResultInput) -> GetResultAsyncOutput {
        self.record("get_result_async");
        self.next.get_result_async(input)
    }

    async fn query(&self, input: QueryInput) -> Result<QueryOutput, ClientError> {
        self.record("query");
        self.next.query(input).await
    }

    async fn cancel(&self, input: CancelInput) -> Result<(), ClientError> {
        self.record("cancel");
        self.next.cancel(input).await
    }

    async fn terminate(&self, input: TerminateInput) -> Result<(), ClientError> {
        self.record("terminate");
        self.next.terminate(input).await
    }
}

#[test]
fn test_options_defaults() {
    let options = WorkflowClientOptions::default();
    assert_eq!(options.namespace, "default");
    assert!(options.identity.ends_with("@strand-client"));
    assert!(options.interceptors.is_empty());
    assert_eq!(options.result_timeout, DEFAULT_RESULT_TIMEOUT);
}

#[tokio::test]
async fn test_start_then_get_typed_result() {
    let service = Arc::new(FakeWorkflowService::new());
    let client = client_with(service.clone(), Vec::new());
    let stub = client.new_workflow_stub("order-7", "OrderWorkflow", WorkflowOptions::new("orders"));

    let order = Order {
        id: 7,
        items: vec!["book".to_string()],
    };
    let execution = stub.start(&order).await.unwrap();
    assert_eq!(execution.run_id.as_deref(), Some("run-1"));
    assert_eq!(stub.execution(), execution);

    let request = service.starts.lock()[0].clone();
    assert_eq!(request.namespace, "orders");
    assert_eq!(request.identity, "client-test");
    let sent: Order =
        strand_protocols::decode_arguments(client.converter().as_ref(), request.input.as_ref())
            .unwrap();
    assert_eq!(sent, order);

    let result = encode(&JsonPayloadConverter, "shipped").unwrap();
    service.push_close_event(
        "order-7",
        Ok(Some(WorkflowCloseEvent::Completed {
            result: Some(Payloads::single(result)),
        })),
    );
    let status: String = stub.get_result(Duration::from_secs(5)).await.unwrap();
    assert_eq!(status, "shipped");
    assert_eq!(
        service.polled_runs.lock().clone(),
        vec![Some("run-1".to_string())]
    );
}

#[tokio::test]
async fn test_existing_execution_stub_cannot_start() {
    let service = Arc::new(FakeWorkflowService::new());
    let client = client_with(service.clone(), Vec::new());
    let stub = client.workflow_stub(WorkflowExecution::latest("order-1"));

    let err = stub.start(&()).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidArgument(ref e) if e.field == "workflow_type"));
    assert!(service.starts.lock().is_empty());
}

#[tokio::test]
async fn test_signal_and_signal_with_start() {
    let service = Arc::new(FakeWorkflowService::new());
    let client = client_with(service.clone(), Vec::new());
    let stub = client.new_workflow_stub("order-1", "OrderWorkflow", WorkflowOptions::new("orders"));

    let execution = stub.signal_with_start("add_item", "pen", &()).await.unwrap();
    assert_eq!(execution.run_id.as_deref(), Some("run-1"));
    stub.signal("add_item", "ink").await.unwrap();

    let signals = service.signals_for("order-1");
    assert_eq!(signals.len(), 2);
    assert_eq!(signals[0].0, "add_item");
    let second: String =
        strand_protocols::decode_arguments(&JsonPayloadConverter, signals[1].1.as_ref()).unwrap();
    assert_eq!(second, "ink");
}

#[tokio::test]
async fn test_query_answered_and_rejected() {
    let service = Arc::new(FakeWorkflowService::new());
    let client = client_with(service.clone(), Vec::new());
    let stub = client.workflow_stub(WorkflowExecution::new("order-1", "run-1"));

    *service.query_response.lock() = Some(QueryWorkflowResponse {
        query_result: Some(Payloads::single(encode(&JsonPayloadConverter, &3u32).unwrap())),
        query_rejected: None,
    });
    let answered: QueryResult<u32> = stub.query("item_count", &()).await.unwrap();
    assert_eq!(answered, QueryResult::Answered(3));

    *service.query_response.lock() = Some(QueryWorkflowResponse {
        query_result: None,
        query_rejected: Some(WorkflowExecutionStatus::Completed),
    });
    let rejected: QueryResult<u32> = stub.query("item_count", &()).await.unwrap();
    assert!(rejected.is_rejected());
    assert_eq!(rejected.answered(), None);

    let sent = service.queries.lock()[0].clone();
    assert_eq!(sent.execution.run_id.as_deref(), Some("run-1"));
}

#[tokio::test]
async fn test_get_result_async_spawns() {
    let service = Arc::new(FakeWorkflowService::new());
    let client = client_with(service.clone(), Vec::new());
    let stub = client.workflow_stub(WorkflowExecution::latest("order-1"));

    let future = stub.get_result_async::<u64>(Duration::from_secs(5)).unwrap();
    service.push_close_event(
        "order-1",
        Ok(Some(WorkflowCloseEvent::Completed {
            result: Some(Payloads::single(encode(&JsonPayloadConverter, &42u64).unwrap())),
        })),
    );
    let value = tokio::spawn(future).await.unwrap().unwrap();
    assert_eq!(value, 42);
}

#[tokio::test]
async fn test_interceptors_run_in_registration_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let service = Arc::new(FakeWorkflowService::new());
    let client = client_with(
        service,
        vec![
            Arc::new(Recording {
                name: "outer",
                log: log.clone(),
            }),
            Arc::new(TracingClientInterceptor::new()),
            Arc::new(Recording {
                name: "inner",
                log: log.clone(),
            }),
        ],
    );
    let stub = client.new_workflow_stub("order-1", "OrderWorkflow", WorkflowOptions::new("orders"));

    stub.start(&()).await.unwrap();
    stub.cancel(Some("changed mind")).await.unwrap();
    stub.terminate("cleanup").await.unwrap();

    assert_eq!(
        log.lock().clone(),
        vec![
            "outer:start",
            "inner:start",
            "outer:cancel",
            "inner:cancel",
            "outer:terminate",
            "inner:terminate",
        ]
    );
}

#[tokio::test]
async fn test_errors_pass_through_decorators_unchanged() {
    let service = Arc::new(FakeWorkflowService::new());
    let client = client_with(service, vec![Arc::new(TracingClientInterceptor::new())]);
    let options =
        WorkflowOptions::new("orders").with_id_reuse_policy(WorkflowIdReusePolicy::RejectDuplicate);
    let first = client.new_workflow_stub("order-1", "OrderWorkflow", options.clone());
    let second = client.new_workflow_stub("order-1", "OrderWorkflow", options);

    first.start(&()).await.unwrap();
    let err = second.start(&()).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Service(ServiceError::AlreadyStarted { ref run_id, .. }) if run_id == "run-1"
    ));

    let err = first
        .get_result::<()>(Duration::from_millis(20))
        .await
        .unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_result_uses_configured_timeout() {
    let service = Arc::new(FakeWorkflowService::new());
    let options = WorkflowClientOptions::new().with_result_timeout(Duration::from_millis(20));
    let client = WorkflowClient::new(service.clone(), options);
    assert_eq!(client.result_timeout(), Duration::from_millis(20));
    let stub = client.new_workflow_stub("order-9", "OrderWorkflow", WorkflowOptions::new("orders"));
    stub.start(&()).await.unwrap();

    let err = stub.result::<()>().await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Timeout { ref timeout, .. } if *timeout == Duration::from_millis(20)
    ));

    service.push_close_event(
        "order-9",
        Ok(Some(WorkflowCloseEvent::Completed {
            result: Some(Payloads::single(encode(&JsonPayloadConverter, &5u8).unwrap())),
        })),
    );
    let value: u8 = stub.result().await.unwrap();
    assert_eq!(value, 5);
}
