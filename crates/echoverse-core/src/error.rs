//! Error types for echoverse-core

use thiserror::Error;

use crate::conversion::Backend;
use crate::session::SessionState;

/// Failure reported by a speech backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Validation message for a submission with no text in it.
pub const NO_INPUT: &str = "no input";

/// Main error type for echoverse-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Speech synthesis failed ({backend}): {source}")]
    Synthesis {
        backend: Backend,
        #[source]
        source: BackendError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid session transition: {from} -> {to}")]
    InvalidTransition { from: SessionState, to: SessionState },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn no_input() -> Self {
        Self::Validation(NO_INPUT.to_string())
    }

    /// Message suitable for showing to the person who submitted the text.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) if msg == NO_INPUT => {
                "Please enter or upload text first.".to_string()
            }
            Self::Validation(msg) => format!("Invalid input: {}", msg),
            Self::Synthesis { source, .. } => format!("Failed to generate audio: {}", source),
            other => format!("Error: {}", other),
        }
    }

    /// Whether this is an input problem rather than a backend failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type alias for echoverse-core
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_user_message() {
        let err = Error::no_input();
        assert_eq!(err.user_message(), "Please enter or upload text first.");
        assert!(err.is_validation());
    }

    #[test]
    fn test_rejected_upload_user_message_includes_cause() {
        let err = Error::Validation("only .txt uploads are supported: story.md".to_string());
        assert_eq!(
            err.user_message(),
            "Invalid input: only .txt uploads are supported: story.md"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_synthesis_user_message_includes_cause() {
        let err = Error::Synthesis {
            backend: Backend::Premium,
            source: BackendError::Api {
                status: 429,
                body: "quota exceeded".to_string(),
            },
        };
        assert_eq!(
            err.user_message(),
            "Failed to generate audio: API error 429: quota exceeded"
        );
        assert!(!err.is_validation());
    }

    #[test]
    fn test_synthesis_error_source() {
        use std::error::Error as _;

        let err = Error::Synthesis {
            backend: Backend::Fallback,
            source: BackendError::Timeout(30),
        };
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("request timed out after 30s"));
        assert!(err.to_string().contains("fallback"));
    }
}
