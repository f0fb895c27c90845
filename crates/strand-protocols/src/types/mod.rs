//! Value types shared across the Strand runtime.

mod execution;
mod payload;

pub use execution::*;
pub use payload::*;
