//! User-implemented workflow logic.

use async_trait::async_trait;

use strand_protocols::{EncodedValues, Payloads, WorkflowError};

use crate::context::WorkflowContext;

/// A workflow type.
///
/// Handlers are usually registered in `init`, so signals that arrived
/// before the entry point started are replayed to them right away.
#[async_trait]
pub trait WorkflowDefinition: Send + Sync {
    fn workflow_type(&self) -> &str;

    fn init(&self, _ctx: &WorkflowContext) -> Result<(), WorkflowError> {
        Ok(())
    }

    /// Entry point. Build the result with [`WorkflowContext::result`].
    async fn execute(
        &self,
        ctx: WorkflowContext,
        args: EncodedValues,
    ) -> Result<Option<Payloads>, WorkflowError>;
}
