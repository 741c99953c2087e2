use crate::core::error::LennyError;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Where configuration values come from.
///
/// The process environment in production, a plain map in tests.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads straight from `std::env`. `.env` files are loaded into the
/// environment once at startup, before any resolver runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl ConfigSource for HashMap<&str, &str> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).map(|v| v.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Provider {
    #[default]
    OpenAI,
    Gemini,
}

impl Provider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::Gemini => "https://generativelanguage.googleapis.com",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAI => "gpt-4-turbo-preview",
            Provider::Gemini => "gemini-2.0-flash",
        }
    }

    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }

    fn model_var(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_MODEL",
            Provider::Gemini => "GEMINI_MODEL",
        }
    }

    fn base_url_var(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_BASE_URL",
            Provider::Gemini => "GEMINI_BASE_URL",
        }
    }

    /// Human-facing name used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OpenAI",
            Provider::Gemini => "Gemini",
        }
    }
}

impl FromStr for Provider {
    type Err = LennyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAI),
            "gemini" => Ok(Provider::Gemini),
            other => Err(LennyError::Config(format!(
                "MODEL_PROVIDER must be either 'openai' or 'gemini', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenAI => f.write_str("openai"),
            Provider::Gemini => f.write_str("gemini"),
        }
    }
}

/// Everything needed to build one authenticated provider client.
#[derive(Debug)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub allowed_origins: Vec<String>,
}

pub struct ConfigResolver<'a, S: ConfigSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: ConfigSource + ?Sized> ConfigResolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Non-blank, trimmed value for `key`
    fn value(&self, key: &str) -> Option<String> {
        self.source
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn resolve_provider(&self) -> Result<ProviderConfig, LennyError> {
        let provider = match self.value("MODEL_PROVIDER") {
            Some(raw) => raw.parse::<Provider>()?,
            None => Provider::default(),
        };

        let api_key = self.value(provider.api_key_var()).ok_or_else(|| {
            LennyError::Config(format!(
                "{} not found in environment variables",
                provider.api_key_var()
            ))
        })?;

        let model = self
            .value(provider.model_var())
            .unwrap_or_else(|| provider.default_model().to_string());

        let base_url = self
            .value(provider.base_url_var())
            .unwrap_or_else(|| provider.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout = match self.value("PROVIDER_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(LennyError::Config(format!(
                        "PROVIDER_TIMEOUT_SECS must be a positive integer, got '{}'",
                        raw
                    )));
                }
            },
            None => None,
        };

        Ok(ProviderConfig {
            provider,
            api_key: SecretString::from(api_key),
            model,
            base_url,
            timeout,
        })
    }

    pub fn resolve_server(&self) -> ServerConfig {
        let origins = match self.value("ALLOWED_ORIGINS") {
            Some(raw) => {
                tracing::info!("Using ALLOWED_ORIGINS from environment: {}", raw);
                parse_origins(&raw)
            }
            None => {
                tracing::info!(
                    "ALLOWED_ORIGINS not set, using default: {}",
                    DEFAULT_ALLOWED_ORIGINS
                );
                parse_origins(DEFAULT_ALLOWED_ORIGINS)
            }
        };

        ServerConfig {
            bind_addr: self
                .value("LENNY_BIND_ADDR")
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            allowed_origins: origins,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

impl ProviderConfig {
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}
