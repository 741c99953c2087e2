use crate::core::error::ProviderError;
use crate::providers::base_client::HttpClient;
use crate::providers::gemini::types::*;
use crate::providers::{Message, Role};
use std::time::Duration;

pub struct GeminiClient {
    pub model: String,
    client: HttpClient,
}

impl GeminiClient {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut client = HttpClient::new(base_url, None, timeout)?;

        // Add API key to query params
        client.add_query_param("key", api_key);

        Ok(Self { client, model })
    }

    pub async fn generate_content(&self, messages: &[Message]) -> Result<String, ProviderError> {
        let payload = build_payload(messages);
        let response = self
            .client
            .post(
                &format!("v1beta/models/{}:generateContent", self.model),
                &payload,
            )
            .await?;

        let response_body: String = response.text().await?;
        let parsed: GeminiResponse = serde_json::from_str(&response_body)?;

        let candidate = parsed.candidates.into_iter().next().ok_or_else(|| {
            ProviderError::InvalidResponse("No candidates in Gemini response".to_string())
        })?;

        let parts = candidate
            .content
            .map(|content| content.parts)
            .filter(|parts| !parts.is_empty())
            .ok_or_else(|| {
                ProviderError::InvalidResponse("First candidate has no content parts".to_string())
            })?;

        let text: String = parts.into_iter().map(|part| part.text).collect();
        let text = text.trim();
        if text.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "First candidate has no text parts".to_string(),
            ));
        }
        Ok(text.to_string())
    }
}

/// The first system message becomes `system_instruction`; the rest of the
/// conversation goes into `contents` with Gemini's `user` / `model` roles.
pub fn build_payload(messages: &[Message]) -> GeminiRequest {
    let mut system_instruction = None;
    let mut contents = Vec::with_capacity(messages.len());

    for message in messages {
        let role = match message.role {
            Role::System => {
                if system_instruction.is_none() {
                    system_instruction = Some(SystemInstruction {
                        parts: vec![GeminiPart {
                            text: message.content.clone(),
                        }],
                    });
                }
                continue;
            }
            Role::User => "user",
            Role::Assistant => "model",
        };

        contents.push(GeminiContentPart {
            role,
            parts: vec![GeminiPart {
                text: message.content.clone(),
            }],
        });
    }

    GeminiRequest {
        contents,
        system_instruction,
    }
}
