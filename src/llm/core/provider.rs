//! Provider trait for completion backends

use async_trait::async_trait;

use super::{error::CompletionError, types::GenerateRequest};

/// Main interface that every completion backend must satisfy
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate a single completion
    ///
    /// Sends the request to the backend and waits for the whole answer.
    ///
    /// # Returns
    /// The text of the first choice, or an error if anything along the way failed
    async fn generate(&self, request: GenerateRequest) -> Result<String, CompletionError>;
}
