use serde_json::Value;

/// Why a send resolved to the configured fallback response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Dispatch failed after retry exhaustion (or a terminal 4xx).
    Dispatch(String),
    /// The stream failed mid-read with nothing displayable.
    StreamFailure(String),
    /// The whole-stream deadline elapsed before drain completion.
    Timeout,
}

/// Resolution of one send, mirroring what was committed to the transcript.
///
/// Sends never surface errors to the caller: every failure path resolves
/// to `Fallback`, so the UI is never left on a stuck typing indicator.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Plain text answer, rich-rendered once at finalization.
    Answer { text: String },
    /// Card/carousel payload, rendered atomically during the stream.
    Structured { payload: Value },
    /// The configured fallback sentence was shown and recorded.
    Fallback { reason: FallbackReason },
    /// Stream ended cleanly but produced nothing; the sentinel warning
    /// entry was recorded instead of silently failing.
    NoContent,
}

impl SendOutcome {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}
