use std::collections::VecDeque;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use reqwest::Response;

use crate::error::ChatApiError;
use crate::events::{classify, ContentEvent};
use crate::framer::LineFramer;

type BytesStream = Pin<Box<dyn Stream<Item = Result<Bytes, ChatApiError>> + Send>>;

/// Pull-based classified view of a streaming response body.
///
/// Wraps the byte stream, the line framer, and the classifier; yields
/// content events in framing order, which is the order bytes arrived.
pub struct EventStream {
    bytes: Option<BytesStream>,
    framer: LineFramer,
    pending: VecDeque<String>,
}

impl EventStream {
    pub(crate) fn from_response(response: Response) -> Self {
        Self::from_bytes(response.bytes_stream().map(|chunk| chunk.map_err(ChatApiError::from)))
    }

    /// Builds an event stream over any chunk source. Framing, ordering, and
    /// release semantics do not depend on HTTP.
    pub fn from_bytes(stream: impl Stream<Item = Result<Bytes, ChatApiError>> + Send + 'static) -> Self {
        Self {
            bytes: Some(Box::pin(stream)),
            framer: LineFramer::default(),
            pending: VecDeque::new(),
        }
    }

    /// Next classified event, or `Ok(None)` once the stream has ended or
    /// the reader was released. `Ignored` lines are consumed internally.
    pub async fn next_event(&mut self) -> Result<Option<ContentEvent>, ChatApiError> {
        loop {
            while let Some(line) = self.pending.pop_front() {
                match classify(&line) {
                    ContentEvent::Ignored => continue,
                    event => return Ok(Some(event)),
                }
            }

            let Some(bytes) = self.bytes.as_mut() else {
                return Ok(None);
            };

            match bytes.next().await {
                Some(Ok(chunk)) => self.pending.extend(self.framer.feed(&chunk)),
                Some(Err(error)) => return Err(error),
                None => {
                    if let Some(partial) = self.framer.take_partial() {
                        tracing::debug!(
                            dropped = partial.len(),
                            "discarding unterminated trailing fragment"
                        );
                    }
                    self.release();
                    return Ok(None);
                }
            }
        }
    }

    /// Drop the underlying byte stream. Idempotent: a repeat release is
    /// logged and reported as `false`, never an error.
    pub fn release(&mut self) -> bool {
        match self.bytes.take() {
            Some(_) => true,
            None => {
                tracing::debug!("stream reader already released");
                false
            }
        }
    }

    pub fn is_released(&self) -> bool {
        self.bytes.is_none()
    }
}
