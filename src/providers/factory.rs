use crate::config::{Provider, ProviderConfig};
use crate::core::error::LennyError;
use crate::providers::{LLMProvider, gemini::GeminiProvider, openai::OpenAIProvider};

/// Build the client for the configured provider.
pub fn build_client(config: &ProviderConfig) -> Result<Box<dyn LLMProvider>, LennyError> {
    let provider: Box<dyn LLMProvider> = match config.provider {
        Provider::OpenAI => Box::new(OpenAIProvider::new(config).map_err(|e| {
            LennyError::Config(format!("Failed to build OpenAI client: {}", e))
        })?),
        Provider::Gemini => Box::new(GeminiProvider::new(config).map_err(|e| {
            LennyError::Config(format!("Failed to build Gemini client: {}", e))
        })?),
    };

    tracing::info!(
        provider = %config.provider,
        model = %config.model,
        "provider client ready"
    );
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigResolver;
    use std::collections::HashMap;

    #[test]
    fn builds_matching_variant() {
        for (selector, key_var, expected) in [
            ("openai", "OPENAI_API_KEY", Provider::OpenAI),
            ("gemini", "GEMINI_API_KEY", Provider::Gemini),
        ] {
            let source: HashMap<&str, &str> =
                [("MODEL_PROVIDER", selector), (key_var, "key")].into_iter().collect();
            let config = ConfigResolver::new(&source).resolve_provider().unwrap();
            let client = build_client(&config).unwrap();
            assert_eq!(client.provider(), expected);
            assert_eq!(client.model(), expected.default_model());
        }
    }
}
