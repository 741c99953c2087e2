use super::{LLMProvider, Message};
use crate::config::{Provider, ProviderConfig};
use crate::core::error::ProviderError;
use crate::providers::base_client::HttpClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
}

#[derive(Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

pub struct OpenAIProvider {
    client: HttpClient,
    model: String,
}

impl OpenAIProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, reqwest::Error> {
        let auth_header = Some((
            "Authorization".to_string(),
            format!("Bearer {}", config.api_key()),
        ));

        Ok(Self {
            client: HttpClient::new(config.base_url.clone(), auth_header, config.timeout)?,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    fn provider(&self) -> Provider {
        Provider::OpenAI
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn get_response(&self, messages: &[Message]) -> Result<String, ProviderError> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| ChatCompletionMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
        };

        let response = self.client.post("chat/completions", &payload).await?;

        let response_body: String = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&response_body)?;

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            ProviderError::InvalidResponse("No choices in API response".to_string())
        })?;

        let content = choice.message.content.ok_or_else(|| {
            ProviderError::InvalidResponse("First choice has no message content".to_string())
        })?;

        Ok(content.trim().to_string())
    }
}
