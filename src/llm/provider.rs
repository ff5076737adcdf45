use async_trait::async_trait;

use crate::errors::CriticError;
use super::types::ModelResponse;

/// Model-invocation handle injected by the caller. Transport, authentication,
/// and prompt engineering beyond the review request framing live behind this
/// trait, outside the orchestration core.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Free-form text completion.
    async fn complete(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<ModelResponse, CriticError>;

    /// Model identifier for logging.
    fn model_name(&self) -> &str;
}
