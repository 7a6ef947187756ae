use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::TranscriptStoreError;
use crate::schema::{current_epoch_ms, PersistedConversation, TranscriptEntry, SCHEMA_VERSION};

/// File-backed conversation store with TTL-scoped loads.
///
/// One JSON record per storage key. Corrupt, structurally invalid, or
/// expired records are discarded on load and reported as "no prior
/// conversation" so a bad record can never wedge the chat.
pub struct TranscriptStore {
    path: PathBuf,
    ttl: Duration,
}

impl TranscriptStore {
    #[must_use]
    pub fn new(root: &Path, storage_key: &str, ttl: Duration) -> Self {
        Self {
            path: root.join(format!("{}.json", sanitize_storage_key(storage_key))),
            ttl,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted conversation, if a valid unexpired record exists.
    ///
    /// Invalid and expired records are deleted and reported as `None`; only
    /// genuine I/O failures surface as errors.
    pub fn load(&self) -> Result<Option<PersistedConversation>, TranscriptStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(TranscriptStoreError::io(
                    "reading conversation record",
                    &self.path,
                    source,
                ))
            }
        };

        let conversation = match serde_json::from_str::<PersistedConversation>(&raw) {
            Ok(conversation) => conversation,
            Err(error) => {
                tracing::warn!(%error, path = %self.path.display(), "discarding unreadable conversation record");
                self.clear()?;
                return Ok(None);
            }
        };

        if let Err(reason) = validate_record(&conversation) {
            tracing::warn!(reason, path = %self.path.display(), "discarding invalid conversation record");
            self.clear()?;
            return Ok(None);
        }

        let age_ms = current_epoch_ms().saturating_sub(conversation.last_activity);
        if age_ms > ttl_millis(self.ttl) {
            tracing::debug!(age_ms, path = %self.path.display(), "conversation expired, starting fresh");
            self.clear()?;
            return Ok(None);
        }

        Ok(Some(conversation))
    }

    /// Persist the transcript, refreshing `last_activity` to now.
    ///
    /// The record is written to a sibling temp file and renamed into place
    /// so a crash mid-write cannot leave a truncated record.
    pub fn save(
        &self,
        history: &[TranscriptEntry],
        session_id: &str,
    ) -> Result<(), TranscriptStoreError> {
        let conversation =
            PersistedConversation::new(history.to_vec(), session_id, current_epoch_ms());
        let raw = serde_json::to_string(&conversation)
            .map_err(|source| TranscriptStoreError::json_serialize(&self.path, source))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)
            .map_err(|source| TranscriptStoreError::io("writing conversation record", &tmp, source))?;
        fs::rename(&tmp, &self.path).map_err(|source| {
            TranscriptStoreError::io("replacing conversation record", &self.path, source)
        })
    }

    /// Remove the persisted record. Missing files are not an error.
    pub fn clear(&self) -> Result<(), TranscriptStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(TranscriptStoreError::io(
                "removing conversation record",
                &self.path,
                source,
            )),
        }
    }
}

fn validate_record(conversation: &PersistedConversation) -> Result<(), &'static str> {
    if conversation.version != SCHEMA_VERSION {
        return Err("unsupported record version");
    }
    if conversation.session_id.trim().is_empty() {
        return Err("missing session id");
    }
    if conversation.last_activity <= 0 {
        return Err("missing last activity");
    }
    for entry in &conversation.message_history {
        if OffsetDateTime::parse(&entry.time, &Rfc3339).is_err() {
            return Err("entry timestamp is not RFC 3339");
        }
    }

    Ok(())
}

fn ttl_millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}

fn sanitize_storage_key(storage_key: &str) -> String {
    storage_key
        .chars()
        .map(|c| match c {
            ':' | '/' | '\\' | ' ' => '-',
            _ => c,
        })
        .collect()
}
