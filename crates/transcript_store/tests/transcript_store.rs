use std::fs;
use std::path::Path;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use transcript_store::{
    current_epoch_ms, PersistedConversation, Role, TranscriptEntry, TranscriptStore,
};

const TTL: Duration = Duration::from_secs(3 * 24 * 60 * 60);

fn store_in(dir: &TempDir) -> TranscriptStore {
    TranscriptStore::new(dir.path(), "chat_conversation", TTL)
}

fn write_raw_record(path: &Path, raw: &str) {
    fs::write(path, raw).expect("record file should be written");
}

fn record_line(last_activity: i64) -> String {
    json!({
        "messageHistory": [
            {"role": "user", "content": "hi", "time": "2026-08-01T10:00:00Z"},
            {"role": "bot", "content": "hello!", "time": "2026-08-01T10:00:03Z"},
        ],
        "sessionId": "11111111-2222-4333-8444-555555555555",
        "lastActivity": last_activity,
        "version": 1,
    })
    .to_string()
}

#[test]
fn save_then_load_round_trips_history() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    let history = vec![
        TranscriptEntry::new(Role::User, "hi", "2026-08-01T10:00:00Z"),
        TranscriptEntry::new(Role::Bot, "hello!", "2026-08-01T10:00:03Z"),
    ];

    store.save(&history, "sess-1").expect("save should succeed");
    let loaded = store
        .load()
        .expect("load should succeed")
        .expect("record should be present");

    assert_eq!(loaded.message_history, history);
    assert_eq!(loaded.session_id, "sess-1");
    assert_eq!(loaded.version, 1);
}

#[test]
fn missing_record_loads_as_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);

    assert!(store.load().expect("load should succeed").is_none());
}

#[test]
fn save_refreshes_last_activity() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    let before = current_epoch_ms();

    store
        .save(&[TranscriptEntry::now(Role::User, "hi")], "sess-1")
        .expect("save should succeed");
    let loaded = store.load().expect("load").expect("record present");

    assert!(loaded.last_activity >= before);
    assert!(loaded.last_activity <= current_epoch_ms());
}

#[test]
fn record_just_inside_ttl_loads() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    let ttl_ms = i64::try_from(TTL.as_millis()).expect("ttl fits");
    write_raw_record(store.path(), &record_line(current_epoch_ms() - ttl_ms + 1));

    assert!(store.load().expect("load should succeed").is_some());
}

#[test]
fn expired_record_is_rejected_and_cleared() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    let ttl_ms = i64::try_from(TTL.as_millis()).expect("ttl fits");
    write_raw_record(store.path(), &record_line(current_epoch_ms() - ttl_ms - 1));

    assert!(store.load().expect("load should succeed").is_none());
    assert!(!store.path().exists());
}

#[test]
fn corrupt_record_is_rejected_and_cleared() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    write_raw_record(store.path(), "{not json");

    assert!(store.load().expect("load should succeed").is_none());
    assert!(!store.path().exists());
}

#[test]
fn record_missing_required_fields_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    write_raw_record(
        store.path(),
        &json!({"messageHistory": [], "version": 1}).to_string(),
    );

    assert!(store.load().expect("load should succeed").is_none());
    assert!(!store.path().exists());
}

#[test]
fn unsupported_version_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    let mut record: serde_json::Value =
        serde_json::from_str(&record_line(current_epoch_ms())).expect("template parses");
    record["version"] = json!(2);
    write_raw_record(store.path(), &record.to_string());

    assert!(store.load().expect("load should succeed").is_none());
}

#[test]
fn invalid_entry_timestamp_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    let mut record: serde_json::Value =
        serde_json::from_str(&record_line(current_epoch_ms())).expect("template parses");
    record["messageHistory"][0]["time"] = json!("yesterday at noon");
    write_raw_record(store.path(), &record.to_string());

    assert!(store.load().expect("load should succeed").is_none());
}

#[test]
fn clear_removes_record_and_tolerates_absence() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);

    store
        .save(&[TranscriptEntry::now(Role::User, "hi")], "sess-1")
        .expect("save should succeed");
    store.clear().expect("clear should succeed");
    store.clear().expect("repeat clear should succeed");

    assert!(store.load().expect("load should succeed").is_none());
}

#[test]
fn storage_key_is_sanitized_for_filenames() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = TranscriptStore::new(dir.path(), "acme:widget/chat", TTL);

    assert!(store
        .path()
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name == "acme-widget-chat.json"));

    let conversation = PersistedConversation::new(Vec::new(), "sess", current_epoch_ms());
    assert_eq!(conversation.version, 1);
}
