mod error;
mod schema;
mod store;

pub use error::TranscriptStoreError;
pub use schema::{current_epoch_ms, PersistedConversation, Role, TranscriptEntry, SCHEMA_VERSION};
pub use store::TranscriptStore;
