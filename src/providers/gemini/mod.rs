use crate::config::{Provider, ProviderConfig};
use crate::core::error::ProviderError;
use crate::providers::{LLMProvider, Message};
use async_trait::async_trait;

mod client;
mod types;

pub use client::GeminiClient;

pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: GeminiClient::new(
                config.base_url.clone(),
                config.api_key().to_string(),
                config.model.clone(),
                config.timeout,
            )?,
        })
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn model(&self) -> &str {
        &self.client.model
    }

    async fn get_response(&self, messages: &[Message]) -> Result<String, ProviderError> {
        self.client.generate_content(messages).await
    }
}
