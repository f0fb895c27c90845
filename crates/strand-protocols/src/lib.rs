//! # Strand Protocols
//!
//! Contract definitions shared by the Strand client and worker crates.
//! Contains interface definitions and plain value types, with only the
//! minimal default implementations needed to use them (a JSON payload
//! converter and a no-op metrics scope).
//!
//! ## Core Contracts
//!
//! - [`PayloadConverter`] - Converts values to and from opaque [`Payload`]s
//! - [`WorkflowService`] - RPC surface of the orchestration service
//! - [`MetricsScope`] - Counter sink used by the runtime
//! - [`build_chain`] - Ordered composition of interceptor layers

pub mod chain;
pub mod converter;
pub mod error;
pub mod metrics;
pub mod service;
pub mod types;

pub use chain::build_chain;
pub use converter::{decode, decode_arguments, encode, EncodedValues, JsonPayloadConverter, PayloadConverter};
pub use error::{
    ClientError, DataConversionError, InvalidArgumentError, ServiceError, WorkflowError,
};
pub use metrics::{Counter, MetricsScope, NoopMetricsScope};
pub use service::WorkflowService;
pub use types::*;
