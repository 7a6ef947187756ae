//! Transport-only chat streaming client primitives.
//!
//! This crate owns request building, retry/backoff, line framing, and content
//! classification for the streaming chat endpoint. It intentionally contains
//! no playback pacing, no persistence, and no UI coupling.
//!
//! The wire contract is line-oriented: each newline-terminated line is either
//! an SSE-style `data:` payload, a bare NDJSON object, or ignorable protocol
//! metadata (`event:` lines and `:` comments). Classification of the payload
//! shapes (plain delta, wrapped final string, rich object) lives in
//! [`events::classify`] so downstream code only deals with [`ContentEvent`].

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod framer;
pub mod headers;
pub mod payload;
pub mod retry;
pub mod stream;

pub use client::ChatApiClient;
pub use config::ChatApiConfig;
pub use error::ChatApiError;
pub use events::{classify, ContentEvent};
pub use framer::LineFramer;
pub use payload::ChatRequest;
pub use stream::EventStream;
