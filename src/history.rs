//! Conversation history as supplied by callers, and its normalization into
//! the message sequence sent to a provider.

use crate::providers::{Message, Role};
use serde::{Deserialize, Serialize};

/// Who wrote a history turn.
///
/// Only `"user"` is meaningful; every other tag is kept verbatim so the
/// history re-encodes unchanged, and is treated as the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sender {
    User,
    Other(String),
}

impl From<String> for Sender {
    fn from(value: String) -> Self {
        if value == "user" {
            Sender::User
        } else {
            Sender::Other(value)
        }
    }
}

impl From<Sender> for String {
    fn from(value: Sender) -> Self {
        match value {
            Sender::User => "user".to_string(),
            Sender::Other(tag) => tag,
        }
    }
}

impl Sender {
    pub fn role(&self) -> Role {
        match self {
            Sender::User => Role::User,
            Sender::Other(_) => Role::Assistant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub sender: Sender,
    pub text: String,
}

impl HistoryEntry {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }
}

/// `[persona] ++ history ++ [text]`, history order preserved.
pub fn build_request(persona: &str, history: &[HistoryEntry], text: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(persona));
    messages.extend(history.iter().map(|entry| match entry.sender.role() {
        Role::User => Message::user(entry.text.as_str()),
        _ => Message::assistant(entry.text.as_str()),
    }));
    messages.push(Message::user(text));
    messages
}

/// Decode the `history_str` form field.
///
/// Absent, blank or malformed input yields an empty history; a malformed
/// payload is logged and otherwise ignored.
pub fn parse_history(raw: Option<&str>) -> Vec<HistoryEntry> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<HistoryEntry>>(raw) {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring malformed history_str");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camp_scenario_normalizes_in_order() {
        let history = vec![
            HistoryEntry::new(Sender::User, "Hi"),
            HistoryEntry::new(Sender::Other("bot".into()), "Hey!"),
        ];

        let request = build_request("PERSONA", &history, "Tell me about camp.");

        let roles: Vec<Role> = request.iter().map(|m| m.role).collect();
        let contents: Vec<&str> = request.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(contents, vec!["PERSONA", "Hi", "Hey!", "Tell me about camp."]);
    }

    #[test]
    fn empty_history_is_persona_then_text() {
        let request = build_request("PERSONA", &[], "hello");
        assert_eq!(
            request,
            vec![Message::system("PERSONA"), Message::user("hello")]
        );
    }

    #[test]
    fn any_non_user_sender_is_assistant() {
        for tag in ["bot", "lenny", "assistant", "User", ""] {
            assert_eq!(Sender::from(tag.to_string()).role(), Role::Assistant, "{tag}");
        }
        assert_eq!(Sender::from("user".to_string()).role(), Role::User);
    }

    #[test]
    fn unknown_sender_turns_become_assistant_messages() {
        let history = vec![
            HistoryEntry::new(Sender::Other("lenny".into()), "Welcome!"),
            HistoryEntry::new(Sender::Other("".into()), "Anyone?"),
        ];

        let request = build_request("P", &history, "hi");

        assert_eq!(
            request,
            vec![
                Message::system("P"),
                Message::assistant("Welcome!"),
                Message::assistant("Anyone?"),
                Message::user("hi"),
            ]
        );
    }

    #[test]
    fn long_history_keeps_order() {
        let history: Vec<HistoryEntry> = (0..10)
            .map(|i| {
                let sender = if i % 2 == 0 {
                    Sender::User
                } else {
                    Sender::Other("bot".into())
                };
                HistoryEntry::new(sender, format!("turn {i}"))
            })
            .collect();

        let request = build_request("P", &history, "last");

        assert_eq!(request.len(), 12);
        assert_eq!(request[0], Message::system("P"));
        for (i, message) in request[1..11].iter().enumerate() {
            assert_eq!(message.content, format!("turn {i}"));
        }
        assert_eq!(request[11], Message::user("last"));
    }

    #[test]
    fn history_json_round_trip_preserves_senders() {
        let raw = r#"[{"sender":"user","text":"Hi"},{"sender":"bot","text":"Hey!"}]"#;
        let history = parse_history(Some(raw));
        assert_eq!(
            history,
            vec![
                HistoryEntry::new(Sender::User, "Hi"),
                HistoryEntry::new(Sender::Other("bot".into()), "Hey!"),
            ]
        );

        let encoded = serde_json::to_string(&history).unwrap();
        assert_eq!(encoded, raw);
        assert_eq!(parse_history(Some(&encoded)), history);
    }

    #[test]
    fn malformed_history_is_empty() {
        assert!(parse_history(Some("[{\"sender\": \"user\"")).is_empty());
        assert!(parse_history(Some("{\"sender\":\"user\",\"text\":\"hi\"}")).is_empty());
        assert!(parse_history(Some("   ")).is_empty());
        assert!(parse_history(None).is_empty());
    }
}
