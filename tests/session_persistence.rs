use std::fs;
use std::time::Duration;

use chat_widget::{ChatConfig, ChatSession, Role, TranscriptEntry, TranscriptStore};
use serde_json::json;
use tempfile::TempDir;

const TTL: Duration = Duration::from_secs(3 * 24 * 60 * 60);

fn config_in(dir: &TempDir) -> ChatConfig {
    let mut config = ChatConfig::new("https://chat.example.dev");
    config.persistence.storage_root = dir.path().to_path_buf();
    config.persistence.conversation_ttl = TTL;
    config
}

fn epoch_ms_now() -> i64 {
    transcript_store::current_epoch_ms()
}

fn seeded_history() -> Vec<TranscriptEntry> {
    vec![
        TranscriptEntry::new(Role::User, "what programs do you offer?", "2026-08-01T10:00:00Z"),
        TranscriptEntry::new(Role::Bot, "We offer three MSc programs.", "2026-08-01T10:00:04Z"),
    ]
}

#[test]
fn restore_picks_up_a_saved_conversation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = TranscriptStore::new(dir.path(), "chat_conversation", TTL);
    store
        .save(&seeded_history(), "11111111-2222-4333-8444-555555555555")
        .expect("seed save should succeed");

    let mut session = ChatSession::new(config_in(&dir)).expect("session");
    assert!(session.restore());

    assert_eq!(session.history(), seeded_history().as_slice());
    assert_eq!(session.session_id(), "11111111-2222-4333-8444-555555555555");
}

#[test]
fn restore_without_a_record_starts_fresh() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut session = ChatSession::new(config_in(&dir)).expect("session");

    assert!(!session.restore());
    assert!(session.history().is_empty());
}

#[test]
fn restore_rejects_an_expired_record_and_clears_it() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ttl_ms = i64::try_from(TTL.as_millis()).expect("ttl fits");
    let record = json!({
        "messageHistory": [
            {"role": "user", "content": "hi", "time": "2026-08-01T10:00:00Z"},
        ],
        "sessionId": "expired-session",
        "lastActivity": epoch_ms_now() - ttl_ms - 1,
        "version": 1,
    });
    let path = dir.path().join("chat_conversation.json");
    fs::write(&path, record.to_string()).expect("record should be written");

    let mut session = ChatSession::new(config_in(&dir)).expect("session");
    assert!(!session.restore());
    assert!(session.history().is_empty());
    assert_ne!(session.session_id(), "expired-session");
    assert!(!path.exists());
}

#[test]
fn restore_rejects_a_corrupt_record() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chat_conversation.json");
    fs::write(&path, "{definitely not json").expect("record should be written");

    let mut session = ChatSession::new(config_in(&dir)).expect("session");
    assert!(!session.restore());
    assert!(!path.exists());
}

#[test]
fn new_chat_clears_history_session_and_record() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = TranscriptStore::new(dir.path(), "chat_conversation", TTL);
    store
        .save(&seeded_history(), "11111111-2222-4333-8444-555555555555")
        .expect("seed save should succeed");

    let mut session = ChatSession::new(config_in(&dir)).expect("session");
    assert!(session.restore());
    let restored_id = session.session_id().to_owned();

    session.start_new_chat();

    assert!(session.history().is_empty());
    assert_ne!(session.session_id(), restored_id);
    assert!(!dir.path().join("chat_conversation.json").exists());
}

#[test]
fn disabled_persistence_never_touches_storage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = config_in(&dir);
    config.persistence.enabled = false;

    let mut session = ChatSession::new(config).expect("session");
    assert!(!session.restore());
    session.start_new_chat();

    let leftover = fs::read_dir(dir.path())
        .expect("storage root should be listable")
        .count();
    assert_eq!(leftover, 0);
}

#[test]
fn each_session_gets_a_distinct_uuid() {
    let dir = tempfile::tempdir().expect("tempdir");
    let first = ChatSession::new(config_in(&dir)).expect("session");
    let second = ChatSession::new(config_in(&dir)).expect("session");

    assert_ne!(first.session_id(), second.session_id());
    assert_eq!(first.session_id().len(), 36);
}
