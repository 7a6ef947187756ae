//! Streaming chat client core.
//!
//! Turns an unbounded, chunk-fragmented HTTP response body carrying
//! SSE-style `data:` lines or bare NDJSON into an ordered sequence of
//! content events, paces their display at a fixed per-character cadence,
//! tolerates malformed or partial input, enforces an overall stream
//! deadline, and commits the final result to a TTL-scoped persisted
//! transcript.
//!
//! The display surface is abstracted behind [`ContentSink`], so the whole
//! pipeline runs headlessly: hosts plug in a terminal, a DOM bridge, or a
//! test recorder without touching transport or playback code.
//!
//! Layering mirrors the workspace: `chat_api` owns transport (dispatch,
//! retry, framing, classification), `transcript_store` owns persistence,
//! and this crate owns playback pacing, the stream deadline, finalization,
//! and the session transcript.

pub mod config;
pub mod outcome;
pub mod pipeline;
pub mod playback;
pub mod session;
pub mod sink;

pub use chat_api::{ChatApiClient, ChatApiConfig, ChatApiError, ChatRequest, ContentEvent};
pub use config::{ChatConfig, PersistenceConfig, RichContentConfig, TtlPreset};
pub use outcome::{FallbackReason, SendOutcome};
pub use pipeline::NO_CONTENT_SENTINEL;
pub use playback::{PlaybackPhase, PlaybackQueue};
pub use session::ChatSession;
pub use sink::ContentSink;
pub use transcript_store::{PersistedConversation, Role, TranscriptEntry, TranscriptStore};
