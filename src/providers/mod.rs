use crate::config::Provider;
use crate::core::error::ProviderError;
use crate::history::{HistoryEntry, build_request};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod base_client;
pub mod factory;
pub mod gemini;
pub mod openai;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[async_trait]
pub trait LLMProvider: Send + Sync {
    fn provider(&self) -> Provider;

    fn model(&self) -> &str;

    /// One completion round-trip. Returns the trimmed text of the first
    /// choice.
    async fn get_response(&self, messages: &[Message]) -> Result<String, ProviderError>;

    /// Persona + history + text in, reply out. Never fails: provider errors
    /// are logged and replaced by their fixed user-facing message.
    async fn send(&self, persona: &str, text: &str, history: &[HistoryEntry]) -> String {
        let messages = build_request(persona, history, text);
        tracing::debug!(
            provider = %self.provider(),
            model = self.model(),
            messages = messages.len(),
            "sending chat request"
        );

        match self.get_response(&messages).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::error!(
                    provider = %self.provider(),
                    error = %err,
                    "chat request to {} API failed",
                    self.provider().label()
                );
                err.user_message(self.provider().label())
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every request and answers from a fixed script. Clones share
    /// the call log.
    #[derive(Clone)]
    pub struct ScriptedProvider {
        reply: Result<String, fn() -> ProviderError>,
        calls: Arc<Mutex<Vec<Vec<Message>>>>,
    }

    impl ScriptedProvider {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn failing(err: fn() -> ProviderError) -> Self {
            Self {
                reply: Err(err),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn calls(&self) -> Vec<Vec<Message>> {
            self.calls.lock().unwrap().clone()
        }
    }

    /// In-memory log sink, installed as the current thread's subscriber for
    /// as long as the returned guard lives.
    #[derive(Clone, Default)]
    pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
            let logs = Self::default();
            let writer = logs.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_writer(move || writer.clone())
                .with_ansi(false)
                .finish();
            (logs, tracing::subscriber::set_default(subscriber))
        }

        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        fn provider(&self) -> Provider {
            Provider::OpenAI
        }

        fn model(&self) -> &str {
            "scripted"
        }

        async fn get_response(&self, messages: &[Message]) -> Result<String, ProviderError> {
            self.calls.lock().unwrap().push(messages.to_vec());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }
}
