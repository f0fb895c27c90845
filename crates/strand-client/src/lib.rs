//! # Strand Client
//!
//! Application-side calls against the orchestration service, routed
//! through an ordered chain of interceptors.
//!
//! ```text
//! WorkflowStub ──► interceptor 1 ──► interceptor 2 ──► ... ──► RootWorkflowClientInvoker ──► WorkflowService
//! ```
//!
//! ## Key Components
//!
//! - [`WorkflowClientCallsInterceptor`]: Capability set every layer implements
//! - [`WorkflowClientInterceptor`]: Factory that wraps the next layer
//! - [`RootWorkflowClientInvoker`]: Terminal layer issuing the RPCs
//! - [`TracingClientInterceptor`]: Logs each call without altering it
//! - [`WorkflowClient`] / [`WorkflowStub`]: Typed facade over the chain

pub mod calls;
pub mod client;
pub mod interceptor;
pub mod root;
pub mod tracing_interceptor;

#[cfg(test)]
mod test_support;

pub use calls::{
    CancelInput, GetResultAsyncOutput, GetResultInput, GetResultOutput, QueryInput, QueryOutput,
    TerminateInput, WorkflowResultFuture, WorkflowSignalInput, WorkflowSignalWithStartInput,
    WorkflowSignalWithStartOutput, WorkflowStartInput, WorkflowStartInputBuilder,
    WorkflowStartOutput,
};
pub use client::{
    QueryResult, WorkflowClient, WorkflowClientOptions, WorkflowStub, DEFAULT_RESULT_TIMEOUT,
};
pub use interceptor::{WorkflowClientCallsInterceptor, WorkflowClientInterceptor};
pub use root::RootWorkflowClientInvoker;
pub use tracing_interceptor::TracingClientInterceptor;

pub use strand_protocols::ClientError;
