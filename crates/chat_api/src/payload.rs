use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Canonical request payload for the chat streaming endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// ISO 8601 send timestamp.
    pub timestamp: String,
    pub session_id: String,
    /// `"{session_id}-{epoch_ms}"`, also carried as the `X-Request-Id` header.
    pub request_id: String,
}

impl ChatRequest {
    /// Builds a request stamped with the current UTC time.
    pub fn new(message: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self::with_timestamp(message, session_id, OffsetDateTime::now_utc())
    }

    /// Builds a request stamped with an explicit send time.
    pub fn with_timestamp(
        message: impl Into<String>,
        session_id: impl Into<String>,
        at: OffsetDateTime,
    ) -> Self {
        let session_id = session_id.into();
        let epoch_ms = at.unix_timestamp_nanos() / 1_000_000;
        let timestamp = at
            .format(&Rfc3339)
            .unwrap_or_else(|_| at.unix_timestamp().to_string());

        Self {
            message: message.into(),
            timestamp,
            request_id: format!("{session_id}-{epoch_ms}"),
            session_id,
        }
    }
}
