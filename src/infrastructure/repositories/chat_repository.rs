use async_trait::async_trait;

/// Repository for the LLM completion service.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Run one completion and return the raw message content. Parsing into
    /// avatar messages happens in the domain.
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, String>;
}
