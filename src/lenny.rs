use crate::config::{ConfigResolver, ConfigSource, ProcessEnv, Provider};
use crate::core::error::LennyError;
use crate::history::HistoryEntry;
use crate::providers::{LLMProvider, factory::build_client};
use serde::{Deserialize, Serialize};

pub const LENNY_SYSTEM_PROMPT: &str = "You are **Lenny**, a warm, funny, Jewish camp counselor AI who reconnects people through shared Jewish experiences — summer camps, youth orgs, and values-driven life paths.

You are the voice of The Camp Pool — a friendly, voice-first AI that speaks to people on LinkedIn or by phone. You gather their story, help them feel seen, and match them with others from the same Jewish network.

Your mission is to help people reflect on their Jewish background, talk about their current interests, identify potential reconnections, feel emotionally connected to The Camp Pool's mission, and optionally support through donations.

You serve both Seekers (those looking for curated introductions) and Lifeguards (natural connectors who want to help).

Speak naturally like a camp counselor, use warm and affirming responses, and maintain a conversational, human tone. Avoid corporate speak and long paragraphs.
";

const MISSING_TEXT: &str = "Message text is required";

/// Body of a chat reply: `{"response": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatReply {
    Response(String),
    Error(String),
}

/// The persona facade. Owns exactly one provider client and no per-call
/// state, so a single instance can serve concurrent callers.
pub struct Lenny {
    provider: Box<dyn LLMProvider>,
    persona: &'static str,
}

impl Lenny {
    pub fn new(provider: Box<dyn LLMProvider>) -> Self {
        Self {
            provider,
            persona: LENNY_SYSTEM_PROMPT,
        }
    }

    pub fn from_source<S: ConfigSource + ?Sized>(source: &S) -> Result<Self, LennyError> {
        let config = ConfigResolver::new(source).resolve_provider()?;
        tracing::info!("Initializing Lenny with provider: {}", config.provider);
        Ok(Self::new(build_client(&config)?))
    }

    pub fn from_env() -> Result<Self, LennyError> {
        Self::from_source(&ProcessEnv)
    }

    pub fn provider(&self) -> Provider {
        self.provider.provider()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub async fn send_msg(&self, text: Option<&str>, history: &[HistoryEntry]) -> ChatReply {
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            tracing::warn!("rejecting chat request without text");
            return ChatReply::Error(MISSING_TEXT.to_string());
        };

        ChatReply::Response(self.provider.send(self.persona, text, history).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ProviderError;
    use crate::history::Sender;
    use crate::providers::Message;
    use crate::providers::testing::ScriptedProvider;
    use std::collections::HashMap;

    fn lenny_with(provider: ScriptedProvider) -> (Lenny, ScriptedProvider) {
        (Lenny::new(Box::new(provider.clone())), provider)
    }

    #[tokio::test]
    async fn empty_text_is_error_without_provider_call() {
        let (lenny, provider) = lenny_with(ScriptedProvider::replying("unused"));

        for text in [None, Some(""), Some("   \n")] {
            let reply = lenny.send_msg(text, &[]).await;
            assert_eq!(reply, ChatReply::Error(MISSING_TEXT.to_string()));
        }
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn persona_always_leads_the_request() {
        let (lenny, provider) = lenny_with(ScriptedProvider::replying("Welcome back!"));
        let history = vec![
            HistoryEntry::new(Sender::User, "Hi"),
            HistoryEntry::new(Sender::Other("bot".into()), "Hey!"),
        ];

        let reply = lenny.send_msg(Some("Tell me about camp."), &history).await;

        assert_eq!(reply, ChatReply::Response("Welcome back!".to_string()));
        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            vec![
                Message::system(LENNY_SYSTEM_PROMPT),
                Message::user("Hi"),
                Message::assistant("Hey!"),
                Message::user("Tell me about camp."),
            ]
        );
    }

    #[tokio::test]
    async fn reusable_across_calls() {
        let (lenny, provider) = lenny_with(ScriptedProvider::replying("ok"));

        lenny.send_msg(Some("one"), &[]).await;
        lenny.send_msg(Some("two"), &[]).await;

        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], vec![Message::system(LENNY_SYSTEM_PROMPT), Message::user("two")]);
    }

    #[tokio::test]
    async fn provider_failure_is_a_response_string() {
        let (lenny, _) = lenny_with(ScriptedProvider::failing(|| {
            ProviderError::Transport("connection refused".into())
        }));

        let reply = lenny.send_msg(Some("hi"), &[]).await;

        assert_eq!(
            reply,
            ChatReply::Response(
                "A connection error occurred while communicating with OpenAI API. Please check your internet connection."
                    .to_string()
            )
        );
    }

    #[test]
    fn construction_fails_without_credentials() {
        let source: HashMap<&str, &str> =
            [("MODEL_PROVIDER", "openai"), ("GEMINI_API_KEY", "g")].into_iter().collect();
        assert!(matches!(Lenny::from_source(&source), Err(LennyError::Config(_))));
    }

    #[test]
    fn construction_fails_for_unknown_provider() {
        let source: HashMap<&str, &str> =
            [("MODEL_PROVIDER", "llama"), ("OPENAI_API_KEY", "sk")].into_iter().collect();
        assert!(matches!(Lenny::from_source(&source), Err(LennyError::Config(_))));
    }

    #[test]
    fn construction_selects_configured_provider() {
        let source: HashMap<&str, &str> =
            [("MODEL_PROVIDER", "gemini"), ("GEMINI_API_KEY", "g")].into_iter().collect();
        let lenny = Lenny::from_source(&source).unwrap();
        assert_eq!(lenny.provider(), Provider::Gemini);
        assert_eq!(lenny.model(), "gemini-2.0-flash");
    }

    #[test]
    fn replies_serialize_to_wire_shape() {
        assert_eq!(
            serde_json::to_value(ChatReply::Response("hi".into())).unwrap(),
            serde_json::json!({"response": "hi"})
        );
        assert_eq!(
            serde_json::to_value(ChatReply::Error("bad".into())).unwrap(),
            serde_json::json!({"error": "bad"})
        );
    }
}
