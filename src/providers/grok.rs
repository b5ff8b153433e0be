use super::openai::{ChatRequest, ChatResponse, WireMessage};
use super::ProviderAdapter;
use crate::config::GrokConfig;
use crate::core::{Message, Role};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Single-turn adapter: only the new message is sent, history is ignored
pub struct GrokAdapter {
    client: Client,
    api_key: Option<String>,
    config: GrokConfig,
}

impl GrokAdapter {
    pub fn new(api_key: Option<String>, config: GrokConfig) -> Self {
        Self {
            client: Client::new(),
            api_key,
            config,
        }
    }
}

#[async_trait]
impl ProviderAdapter for GrokAdapter {
    fn name(&self) -> &str {
        "grok"
    }

    async fn complete(&self, message: &str, _history: &[Message]) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![WireMessage::new(Role::User.as_str(), message)],
            max_tokens: None,
            temperature: None,
        };

        let endpoint = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let mut builder = self.client.post(&endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!("[GrokAdapter] API returned error status {}: {}", status, error_text);
            anyhow::bail!("API error {}: {}", status, error_text);
        }

        response
            .json::<ChatResponse>()
            .await
            .context("Response decode error")?
            .into_reply()
    }
}
