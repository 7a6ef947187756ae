use chat_api::{ChatApiError, ContentEvent, EventStream};
use serde_json::Value;

use crate::config::ChatConfig;
use crate::outcome::{FallbackReason, SendOutcome};
use crate::playback::PlaybackQueue;
use crate::sink::ContentSink;

/// Sentinel bot entry recorded when a stream ends cleanly with no content.
pub const NO_CONTENT_SENTINEL: &str = "No content received from stream";

/// Seam over [`EventStream`] so the pipeline is testable with scripted
/// event sequences.
pub(crate) trait EventSource {
    async fn next_event(&mut self) -> Result<Option<ContentEvent>, ChatApiError>;
}

impl EventSource for EventStream {
    async fn next_event(&mut self) -> Result<Option<ContentEvent>, ChatApiError> {
        EventStream::next_event(self).await
    }
}

/// Where one message's stream ended up after the deadline race.
#[derive(Debug)]
pub(crate) struct StreamFinish {
    pub displayed: String,
    pub final_output: Option<String>,
    pub structured: Option<Value>,
    pub read_error: Option<ChatApiError>,
    pub timed_out: bool,
}

/// Read classified events and drain the playback queue concurrently,
/// racing both against the whole-stream deadline.
///
/// The read loop and the drain loop interleave cooperatively on the
/// calling task; losing the deadline race drops both futures, which
/// cancels every pending character timer outright.
pub(crate) async fn run_stream<E, S>(
    config: &ChatConfig,
    source: &mut E,
    sink: &mut S,
) -> StreamFinish
where
    E: EventSource,
    S: ContentSink,
{
    let queue = PlaybackQueue::new(config.char_delay());

    let reader = read_events(config, source, queue.clone());
    let drain = queue.drain(sink);

    match tokio::time::timeout(config.stream_timeout(), async {
        tokio::join!(reader, drain)
    })
    .await
    {
        Ok(((final_output, read_error), displayed)) => StreamFinish {
            displayed,
            final_output,
            structured: queue.structured_payload(),
            read_error,
            timed_out: false,
        },
        Err(_elapsed) => {
            tracing::warn!(
                timeout_ms = config.stream_timeout_ms,
                "stream deadline elapsed before drain completion"
            );
            StreamFinish {
                displayed: queue.displayed_text(),
                final_output: None,
                structured: queue.structured_payload(),
                read_error: None,
                timed_out: true,
            }
        }
    }
}

async fn read_events<E: EventSource>(
    config: &ChatConfig,
    source: &mut E,
    queue: PlaybackQueue,
) -> (Option<String>, Option<ChatApiError>) {
    let mut final_output = None;
    let mut read_error = None;

    loop {
        match source.next_event().await {
            Ok(Some(ContentEvent::Text { fragment })) => {
                queue.enqueue(fragment);
            }
            Ok(Some(ContentEvent::FinalOutput { text })) => {
                // Authoritative complete answer; supersedes partial text.
                final_output = Some(text);
            }
            Ok(Some(ContentEvent::Structured { payload })) => {
                if config.rich_content.cards_enabled() {
                    queue.mark_structured(payload);
                } else {
                    queue.enqueue(structured_fallback_text(&payload));
                }
            }
            Ok(Some(ContentEvent::Ignored)) => {}
            Ok(None) => break,
            Err(error) => {
                tracing::warn!(%error, "stream read failed, ending playback early");
                read_error = Some(error);
                break;
            }
        }
    }

    queue.end_of_stream();
    (final_output, read_error)
}

/// Finalization: decide the committed bot content and run the single rich
/// render pass (or the fallback substitution) on the sink.
///
/// Returns the outcome together with the exact content to append to the
/// transcript; the caller owns persistence.
pub(crate) fn resolve_finish<S: ContentSink>(
    config: &ChatConfig,
    finish: StreamFinish,
    sink: &mut S,
) -> (SendOutcome, String) {
    if finish.timed_out {
        return resolve_fallback(config, FallbackReason::Timeout, sink);
    }

    if let Some(payload) = finish.structured {
        // Already rendered atomically during the stream.
        sink.hide_typing();
        let serialized = payload.to_string();
        return (SendOutcome::Structured { payload }, serialized);
    }

    let final_text = match finish.final_output {
        Some(text) if !text.is_empty() => text,
        _ => finish.displayed,
    };

    if !final_text.is_empty() {
        sink.hide_typing();
        sink.render_final(&final_text);
        return (SendOutcome::Answer { text: final_text.clone() }, final_text);
    }

    if let Some(error) = finish.read_error {
        return resolve_fallback(config, FallbackReason::StreamFailure(error.to_string()), sink);
    }

    sink.hide_typing();
    sink.render_final(NO_CONTENT_SENTINEL);
    (SendOutcome::NoContent, NO_CONTENT_SENTINEL.to_owned())
}

/// Force the configured fallback sentence onto the sink and transcript.
pub(crate) fn resolve_fallback<S: ContentSink>(
    config: &ChatConfig,
    reason: FallbackReason,
    sink: &mut S,
) -> (SendOutcome, String) {
    sink.hide_typing();
    sink.render_final(&config.fallback_response);
    (
        SendOutcome::Fallback { reason },
        config.fallback_response.clone(),
    )
}

/// Plain-text stand-in used when card rendering is disabled.
fn structured_fallback_text(payload: &Value) -> String {
    if payload.get("type").and_then(Value::as_str) == Some("carousel") {
        let count = payload
            .get("items")
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0);
        return format!("{count} items available");
    }

    let title = payload.get("title").and_then(Value::as_str).unwrap_or("");
    let description = payload
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or("");
    format!("{title}\n{description}").trim().to_owned()
}
