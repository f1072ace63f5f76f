use super::chat_repository::ChatRepository;
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

const MAX_COMPLETION_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.6;

/// OpenAI implementation of the completion collaborator.
pub struct OpenAiChatRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiChatRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl ChatRepository for OpenAiChatRepository {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, String> {
        let start_time = std::time::Instant::now();

        tracing::info!(
            model = %self.model,
            prompt_length = user_message.len(),
            "Calling OpenAI chat completion"
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .max_tokens(MAX_COMPLETION_TOKENS)
            .temperature(TEMPERATURE)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|e| format!("failed to build system message: {e}"))?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_message)
                    .build()
                    .map_err(|e| format!("failed to build user message: {e}"))?
                    .into(),
            ])
            .build()
            .map_err(|e| format!("failed to build completion request: {e}"))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, model = %self.model, "OpenAI completion failed");
                format!("OpenAI completion error: {e}")
            })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| "completion returned no content".to_string())?;

        tracing::info!(
            model = %self.model,
            latency_ms = start_time.elapsed().as_millis(),
            content_length = content.len(),
            "Completion received"
        );

        Ok(content)
    }
}
