use std::io;
use thiserror::Error;

/// Process-level errors for the Lenny service
#[derive(Error, Debug)]
pub enum LennyError {
    /// Missing or invalid provider selection, credentials or settings.
    /// Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// HTTP server errors (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

/// Failure kinds produced while talking to a provider.
///
/// Every variant maps to exactly one user-facing string, see
/// [`ProviderError::user_message`].
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider could not be reached (connect, timeout, broken request)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider answered with a body we cannot interpret
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Anything else, e.g. a non-success HTTP status
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ProviderError {
    /// Fixed, caller-safe message for this failure kind.
    ///
    /// `provider` is the display label ("OpenAI", "Gemini").
    pub fn user_message(&self, provider: &str) -> String {
        match self {
            ProviderError::Transport(_) => format!(
                "A connection error occurred while communicating with {} API. Please check your internet connection.",
                provider
            ),
            ProviderError::InvalidResponse(_) => format!(
                "An error occurred due to an invalid input or response from {} API.",
                provider
            ),
            ProviderError::Unknown(summary) => {
                format!("An unexpected error occurred: {}", summary)
            }
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Transport(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            ProviderError::Transport(format!("Connection failed: {}", err))
        } else if err.is_decode() || err.is_body() {
            ProviderError::InvalidResponse(format!("Failed to read response body: {}", err))
        } else if let Some(status) = err.status() {
            ProviderError::Unknown(format!("API returned error status {}", status.as_u16()))
        } else if err.is_request() {
            ProviderError::Transport(format!("Request failed: {}", err))
        } else {
            ProviderError::Unknown(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::InvalidResponse(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_message_is_fixed() {
        let a = ProviderError::Transport("dns failure".into()).user_message("OpenAI");
        let b = ProviderError::Transport("connection reset".into()).user_message("OpenAI");
        assert_eq!(a, b);
        assert!(a.contains("connection error"));
        assert!(a.contains("OpenAI API"));
    }

    #[test]
    fn invalid_response_message_hides_detail() {
        let msg = ProviderError::InvalidResponse("missing field `choices`".into())
            .user_message("Gemini");
        assert_eq!(
            msg,
            "An error occurred due to an invalid input or response from Gemini API."
        );
    }

    #[test]
    fn unknown_message_carries_summary() {
        let msg = ProviderError::Unknown("API returned error status 500".into())
            .user_message("OpenAI");
        assert_eq!(
            msg,
            "An unexpected error occurred: API returned error status 500"
        );
    }

    #[test]
    fn json_errors_are_invalid_responses() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(
            ProviderError::from(err),
            ProviderError::InvalidResponse(_)
        ));
    }
}
