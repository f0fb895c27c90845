//! Typed handle given to workflow code.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use strand_protocols::{
    decode_arguments, encode, PayloadConverter, Payloads, WorkflowError,
};

use crate::handlers::{DynamicSignalHandler, QueryRegistrationRequest, SignalRegistrationRequest};
use crate::outbound::{
    ActivityInput, RegisterDynamicSignalHandlerInput, RegisterQueryInput,
    RegisterSignalHandlersInput, WorkflowOutboundCallsInterceptor,
};

/// Workflow code's view of the outbound chain.
///
/// Every call goes through the outermost outbound layer, so decorators
/// see registrations and runtime primitives alike.
#[derive(Clone)]
pub struct WorkflowContext {
    outbound: Arc<dyn WorkflowOutboundCallsInterceptor>,
    converter: Arc<dyn PayloadConverter>,
}

impl WorkflowContext {
    pub fn new(
        outbound: Arc<dyn WorkflowOutboundCallsInterceptor>,
        converter: Arc<dyn PayloadConverter>,
    ) -> Self {
        Self {
            outbound,
            converter,
        }
    }

    pub fn outbound(&self) -> &Arc<dyn WorkflowOutboundCallsInterceptor> {
        &self.outbound
    }

    pub fn converter(&self) -> &Arc<dyn PayloadConverter> {
        &self.converter
    }

    /// Register a handler for one signal name.
    pub fn register_signal<A, F>(&self, signal_name: &str, handler: F) -> Result<(), WorkflowError>
    where
        A: DeserializeOwned + 'static,
        F: Fn(A) + Send + Sync + 'static,
    {
        self.register_signals(vec![SignalRegistrationRequest::new(signal_name, handler)])
    }

    /// Register several handlers as one batch.
    pub fn register_signals(
        &self,
        requests: Vec<SignalRegistrationRequest>,
    ) -> Result<(), WorkflowError> {
        self.outbound
            .register_signal_handlers(RegisterSignalHandlersInput::new(requests))
    }

    pub fn register_dynamic_signal<H>(&self, handler: H) -> Result<(), WorkflowError>
    where
        H: DynamicSignalHandler + 'static,
    {
        self.outbound
            .register_dynamic_signal_handler(RegisterDynamicSignalHandlerInput::new(Arc::new(handler)))
    }

    pub fn register_query<A, R, F>(&self, query_type: &str, handler: F) -> Result<(), WorkflowError>
    where
        A: DeserializeOwned + 'static,
        R: Serialize + 'static,
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        self.outbound
            .register_query(RegisterQueryInput::new(QueryRegistrationRequest::new(query_type, handler)))
    }

    /// Run an activity and decode its result.
    pub async fn execute_activity<A, R>(&self, activity_type: &str, args: &A) -> Result<R, WorkflowError>
    where
        A: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let arguments = Payloads::single(encode(self.converter.as_ref(), args)?);
        let output = self
            .outbound
            .execute_activity(ActivityInput::new(activity_type, Some(arguments)))
            .await?;
        Ok(decode_arguments(self.converter.as_ref(), output.result.as_ref())?)
    }

    pub async fn sleep(&self, duration: Duration) -> Result<(), WorkflowError> {
        self.outbound.sleep(duration).await
    }

    pub fn current_time_millis(&self) -> i64 {
        self.outbound.current_time_millis()
    }

    /// Encode a value as the workflow result.
    pub fn result<R: Serialize + ?Sized>(&self, value: &R) -> Result<Option<Payloads>, WorkflowError> {
        Ok(Some(Payloads::single(encode(self.converter.as_ref(), value)?)))
    }
}

impl std::fmt::Debug for WorkflowContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowContext").finish_non_exhaustive()
    }
}
