use std::fmt;

use reqwest::StatusCode;

#[derive(Debug)]
pub enum ChatApiError {
    MissingEndpoint,
    InvalidHeader(String),
    Request(reqwest::Error),
    Status(StatusCode, String),
    Timeout,
    RetryExhausted {
        status: Option<StatusCode>,
        last_error: Option<String>,
    },
}

impl fmt::Display for ChatApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEndpoint => write!(f, "chat endpoint is required"),
            Self::InvalidHeader(message) => write!(f, "invalid header: {message}"),
            Self::Request(error) => write!(f, "request error: {error}"),
            Self::Status(status, message) => write!(f, "HTTP {status} {message}"),
            Self::Timeout => write!(f, "request attempt timed out"),
            Self::RetryExhausted { status, last_error } => {
                let status = status
                    .map(|status| status.as_u16().to_string())
                    .unwrap_or_else(|| "n/a".to_owned());
                write!(f, "retry exhausted after max attempts (status: {status}, last_error: {last_error:?})")
            }
        }
    }
}

impl std::error::Error for ChatApiError {}

impl From<reqwest::Error> for ChatApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(error)
        }
    }
}

impl ChatApiError {
    /// True when the failure is transport-level and a retry is worthwhile.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Timeout)
    }
}

/// Best-effort human-readable message from an error response body.
pub fn error_body_message(status: StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.trim().to_string()
    }
}
