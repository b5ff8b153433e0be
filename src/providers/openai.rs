use super::ProviderAdapter;
use crate::config::OpenAIConfig;
use crate::core::{Message, Role};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireMessage {
    pub role: String,
    pub content: String,
}

impl WireMessage {
    pub(crate) fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        Self::new(message.role().as_str(), message.content())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: WireMessage,
}

impl ChatResponse {
    pub(crate) fn into_reply(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("Response contained no choices"))
    }
}

/// Adapter for OpenAI-style chat completion APIs
pub struct OpenAIAdapter {
    client: Client,
    api_key: String,
    config: OpenAIConfig,
}

impl OpenAIAdapter {
    pub fn new(api_key: String, config: OpenAIConfig) -> Self {
        Self {
            client: Client::new(),
            api_key,
            config,
        }
    }

    fn build_request(&self, message: &str, history: &[Message]) -> ChatRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);

        if let Some(system) = &self.config.system_prompt {
            messages.push(WireMessage::new("system", system.as_str()));
        }

        messages.extend(history.iter().map(WireMessage::from));

        let ends_with_message = history
            .last()
            .is_some_and(|last| last.role() == Role::User && last.content() == message);
        if !ends_with_message {
            messages.push(WireMessage::new(Role::User.as_str(), message));
        }

        ChatRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

/// Exponential backoff before retry `attempt` (1-based), saturating instead of overflowing
fn backoff_delay_ms(base_delay_ms: u64, attempt: u32) -> u64 {
    base_delay_ms.saturating_mul(2_u64.saturating_pow(attempt.saturating_sub(1)))
}

#[async_trait]
impl ProviderAdapter for OpenAIAdapter {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, message: &str, history: &[Message]) -> Result<String> {
        let request = self.build_request(message, history);
        let endpoint = self.endpoint();
        let max_retries = self.config.max_retries.max(1);
        let base_delay_ms = self.config.retry_base_delay_ms;

        let mut last_error = None;

        for attempt in 0..max_retries {
            if attempt > 0 {
                let delay = backoff_delay_ms(base_delay_ms, attempt);
                tracing::warn!(
                    "[OpenAIAdapter] Retrying API call (attempt {}/{}) after {}ms delay",
                    attempt + 1,
                    max_retries,
                    delay
                );
                tokio::time::sleep(tokio::time::Duration::from_millis(delay)).await;
            }

            let response_result = self
                .client
                .post(&endpoint)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await;

            let response = match response_result {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::warn!("[OpenAIAdapter] HTTP request failed: {}", e);
                    last_error = Some(anyhow::anyhow!("HTTP request failed: {}", e));
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                tracing::warn!(
                    "[OpenAIAdapter] API returned error status {}: {}",
                    status,
                    error_text
                );
                last_error = Some(anyhow::anyhow!("API error {}: {}", status, error_text));
                continue;
            }

            let chat_response = match response.json::<ChatResponse>().await {
                Ok(cr) => cr,
                Err(e) => {
                    tracing::warn!("[OpenAIAdapter] Failed to decode response body: {}", e);
                    last_error = Some(anyhow::anyhow!("Response decode error: {}", e));
                    continue;
                }
            };

            return chat_response.into_reply();
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("All retry attempts failed")))
    }
}
