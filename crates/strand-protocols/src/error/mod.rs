//! Error types for the Strand protocol layer.

mod argument;
mod client;
mod conversion;
mod service;
mod workflow;

pub use argument::*;
pub use client::*;
pub use conversion::*;
pub use service::*;
pub use workflow::*;
