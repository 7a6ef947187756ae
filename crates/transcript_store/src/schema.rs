use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Storage record version this crate reads and writes.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// One committed conversation turn. Entries are append-only: finalization
/// may append a fallback entry, never mutate a prior one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
    /// RFC 3339 commit timestamp.
    pub time: String,
}

impl TranscriptEntry {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            time: time.into(),
        }
    }

    /// Stamps the entry with the current UTC time.
    #[must_use]
    pub fn now(role: Role, content: impl Into<String>) -> Self {
        let time = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| OffsetDateTime::now_utc().unix_timestamp().to_string());
        Self::new(role, content, time)
    }
}

/// Durable conversation record, keyed by the configured storage key.
///
/// Valid only while `now - last_activity` stays within the configured TTL;
/// `last_activity` is refreshed on every successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedConversation {
    #[serde(rename = "messageHistory")]
    pub message_history: Vec<TranscriptEntry>,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    /// Epoch milliseconds of the most recent save.
    #[serde(rename = "lastActivity")]
    pub last_activity: i64,
    pub version: u32,
}

impl PersistedConversation {
    #[must_use]
    pub fn new(
        message_history: Vec<TranscriptEntry>,
        session_id: impl Into<String>,
        last_activity: i64,
    ) -> Self {
        Self {
            message_history,
            session_id: session_id.into(),
            last_activity,
            version: SCHEMA_VERSION,
        }
    }
}

pub fn current_epoch_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
