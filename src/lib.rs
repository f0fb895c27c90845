//! # Strand
//!
//! Client runtime for a durable workflow orchestration service.
//!
//! Application code talks to the service through [`client::WorkflowClient`],
//! whose calls flow through an ordered chain of client interceptors. Worker
//! code runs workflow instances through [`worker::WorkflowInstance`], whose
//! inbound and outbound calls flow through their own chains and whose signals
//! are routed by a per-instance [`worker::SignalDispatcher`].
//!
//! This crate re-exports the member crates and wires them to configuration
//! and logging.

pub mod bootstrap;
pub mod logging;

pub use strand_client as client;
pub use strand_config as config;
pub use strand_protocols as protocols;
pub use strand_worker as worker;

pub use bootstrap::{client_options, load_config, worker_options};
pub use logging::{init_tracing, LoggingError};
