//! Error types for echoverse-voice

use std::time::Duration;

use echoverse_core::BackendError;
use reqwest::StatusCode;
use thiserror::Error;

/// echoverse-voice error type (client construction)
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, VoiceError>;

/// Map a failed send/read into a backend error.
pub(crate) fn transport_error(e: reqwest::Error, timeout: Duration) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout(timeout.as_secs())
    } else {
        BackendError::Transport(e.to_string())
    }
}

/// Map a non-success HTTP status into a backend error.
pub(crate) fn status_error(status: StatusCode, body: String) -> BackendError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            BackendError::Auth(format!("{}: {}", status, body))
        }
        _ => BackendError::Api {
            status: status.as_u16(),
            body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_auth() {
        let err = status_error(StatusCode::UNAUTHORIZED, "Unauthorized".to_string());
        assert!(matches!(err, BackendError::Auth(ref msg) if msg.contains("Unauthorized")));

        let err = status_error(StatusCode::FORBIDDEN, String::new());
        assert!(matches!(err, BackendError::Auth(_)));
    }

    #[test]
    fn test_status_error_api() {
        let err = status_error(StatusCode::TOO_MANY_REQUESTS, "slow down".to_string());
        assert_eq!(
            err,
            BackendError::Api {
                status: 429,
                body: "slow down".to_string()
            }
        );
    }
}
