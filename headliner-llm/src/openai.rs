use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use headliner_core::{ChatMessage, ChatRole, HeadlinerError, LlmRequest};
use tracing::{debug, instrument};

use crate::client::LlmClient;

/// OpenRouter speaks the OpenAI chat-completions protocol
pub const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";

pub const DEFAULT_MODEL: &str = "anthropic/claude-3.7-sonnet";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// Chat-completion client for any OpenAI-compatible endpoint
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: Client<OpenAIConfig>,
    timeout: Duration,
}

impl OpenRouterClient {
    pub fn new(api_key: &str, api_base: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_base(api_base)
            .with_api_key(api_key);

        Self {
            client: Client::with_config(config),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build with the key from `OPENROUTER_API_KEY`, falling back to `OPENAI_API_KEY`
    pub fn from_env(api_base: &str) -> Result<Self, HeadlinerError> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .map_err(|_| {
                HeadlinerError::config("OPENROUTER_API_KEY or OPENAI_API_KEY must be set")
            })?;

        Ok(Self::new(&api_key, api_base))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn to_request_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage, HeadlinerError> {
    let converted = match message.role {
        ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(message.content.as_str())
            .build()
            .map_err(|e| HeadlinerError::internal(e.to_string()))?
            .into(),
        ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(message.content.as_str())
            .build()
            .map_err(|e| HeadlinerError::internal(e.to_string()))?
            .into(),
        ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(message.content.as_str())
            .build()
            .map_err(|e| HeadlinerError::internal(e.to_string()))?
            .into(),
    };
    Ok(converted)
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: &LlmRequest) -> Result<String, HeadlinerError> {
        let messages = request
            .messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>, _>>()?;

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&request.model)
            .messages(messages)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .build()
            .map_err(|e| HeadlinerError::internal(e.to_string()))?;

        debug!(
            "Calling LLM with {} messages (max_tokens={})",
            request.messages.len(),
            request.max_tokens
        );

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(chat_request))
            .await
            .map_err(|_| {
                HeadlinerError::timeout(format!(
                    "LLM call exceeded {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| HeadlinerError::api(format!("LLM API error: {}", e)))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| HeadlinerError::parse("No response from LLM"))
    }
}
