//! # Strand Worker
//!
//! Workflow-side half of the runtime: the boundary between the
//! orchestration runtime and one workflow instance.
//!
//! ```text
//!                  ┌────────────── inbound chain ──────────────┐
//! runtime ──────►  │ decorator 1 ─► ... ─► RootWorkflowInbound │ ──► WorkflowDefinition
//!                  └───────────────────────────────────────────┘          │
//!                                                                         ▼
//!                  ┌────────────── outbound chain ─────────────┐   WorkflowContext
//! dispatchers ◄──  │ RootWorkflowOutbound ◄─ ... ◄─ decorator 1 │ ◄──────┘
//!                  └───────────────────────────────────────────┘
//! ```
//!
//! ## Key Components
//!
//! - [`SignalDispatcher`]: Routes signals to named handlers, a dynamic
//!   fallback, or a buffer replayed on registration
//! - [`QueryDispatcher`]: Name-keyed synchronous query handlers
//! - [`ExecutionGate`]: Single-owner token serializing work on one instance
//! - [`WorkflowInstance`]: Hosts a [`WorkflowDefinition`] behind the chains
//! - [`TracingWorkerInterceptor`]: Logs inbound and outbound calls

pub mod context;
pub mod gate;
pub mod handlers;
pub mod inbound;
pub mod instance;
pub mod metrics;
pub mod outbound;
pub mod query_dispatcher;
pub mod root;
pub mod runtime;
pub mod signal_dispatcher;
pub mod tracing_interceptor;
pub mod workflow;

pub use context::WorkflowContext;
pub use gate::ExecutionGate;
pub use handlers::{
    DynamicSignalHandler, QueryCallback, QueryRegistrationRequest, SignalCallback, SignalRecord,
    SignalRegistrationRequest,
};
pub use inbound::{
    HandleQueryInput, HandleQueryOutput, SignalInput, WorkerInterceptor,
    WorkflowInboundCallsInterceptor, WorkflowInput, WorkflowOutput,
};
pub use instance::{WorkflowInstance, WorkflowInstanceOptions};
pub use metrics::{AtomicCounter, InMemoryMetricsScope, CORRUPTED_SIGNALS_COUNTER};
pub use outbound::{
    ActivityInput, ActivityOutput, RegisterDynamicSignalHandlerInput, RegisterQueryInput,
    RegisterSignalHandlersInput, RootWorkflowOutbound, WorkflowOutboundCallsInterceptor,
};
pub use query_dispatcher::QueryDispatcher;
pub use root::RootWorkflowInbound;
pub use runtime::WorkflowRuntime;
pub use signal_dispatcher::SignalDispatcher;
pub use tracing_interceptor::TracingWorkerInterceptor;
pub use workflow::WorkflowDefinition;

pub use strand_protocols::WorkflowError;
