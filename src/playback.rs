use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Notify;

use crate::sink::ContentSink;

/// Lifecycle of one bot message's playback.
///
/// Replaces the ad-hoc `isProcessingQueue`/`streamComplete` flag pair with
/// a single progression; transitions only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// Created, no content yet.
    Idle,
    /// Network loop is feeding fragments.
    Streaming,
    /// Network loop has ended; the queue is flushing.
    Draining,
    /// Drain completion fired. Terminal.
    Finalized,
}

#[derive(Debug)]
struct PlaybackState {
    queue: VecDeque<String>,
    displayed: String,
    structured: Option<Value>,
    structured_rendered: bool,
    phase: PlaybackPhase,
}

enum Step {
    Render(Value),
    Type(String),
    Wait,
    Done,
}

/// FIFO playback queue with character-paced draining.
///
/// Cheaply cloneable handle: the network read loop enqueues while
/// [`PlaybackQueue::drain`] displays, the two interleaving cooperatively on
/// one task. The `drain` future is the message's one-shot drain-completion
/// signal; dropping it (e.g. when the stream deadline wins a race) cancels
/// every pending character timer.
#[derive(Clone)]
pub struct PlaybackQueue {
    state: Arc<Mutex<PlaybackState>>,
    wake: Arc<Notify>,
    char_delay: Duration,
}

impl PlaybackQueue {
    #[must_use]
    pub fn new(char_delay: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(PlaybackState {
                queue: VecDeque::new(),
                displayed: String::new(),
                structured: None,
                structured_rendered: false,
                phase: PlaybackPhase::Idle,
            })),
            wake: Arc::new(Notify::new()),
            char_delay,
        }
    }

    /// Append one text fragment for paced display.
    ///
    /// Returns `false` when the fragment is dropped: after a structured
    /// payload short-circuited the message, or once the stream has ended.
    pub fn enqueue(&self, fragment: String) -> bool {
        let mut state = self.lock_state();

        match state.phase {
            PlaybackPhase::Draining | PlaybackPhase::Finalized => {
                tracing::warn!(phase = ?state.phase, "dropping fragment enqueued after end of stream");
                return false;
            }
            PlaybackPhase::Idle => state.phase = PlaybackPhase::Streaming,
            PlaybackPhase::Streaming => {}
        }

        if state.structured.is_some() {
            tracing::debug!("dropping text fragment after structured content");
            return false;
        }

        state.queue.push_back(fragment);
        drop(state);
        self.wake.notify_one();
        true
    }

    /// Short-circuit to structured content: pending plain text is
    /// discarded and later fragments are refused; the payload renders as
    /// one unit without character pacing.
    pub fn mark_structured(&self, payload: Value) {
        let mut state = self.lock_state();

        if state.phase == PlaybackPhase::Finalized {
            tracing::warn!("ignoring structured payload after finalization");
            return;
        }
        if state.phase == PlaybackPhase::Idle {
            state.phase = PlaybackPhase::Streaming;
        }

        state.queue.clear();
        state.structured = Some(payload);
        drop(state);
        self.wake.notify_one();
    }

    /// Signal that the network read loop has ended.
    pub fn end_of_stream(&self) {
        let mut state = self.lock_state();

        match state.phase {
            PlaybackPhase::Idle | PlaybackPhase::Streaming => {
                state.phase = PlaybackPhase::Draining;
            }
            PlaybackPhase::Draining => {
                tracing::debug!("end of stream signalled twice");
            }
            PlaybackPhase::Finalized => {
                tracing::warn!("end of stream signalled after finalization");
            }
        }

        drop(state);
        self.wake.notify_one();
    }

    #[must_use]
    pub fn phase(&self) -> PlaybackPhase {
        self.lock_state().phase
    }

    #[must_use]
    pub fn is_structured(&self) -> bool {
        self.lock_state().structured.is_some()
    }

    /// Structured payload received for this message, if any.
    #[must_use]
    pub fn structured_payload(&self) -> Option<Value> {
        self.lock_state().structured.clone()
    }

    /// Text displayed so far.
    #[must_use]
    pub fn displayed_text(&self) -> String {
        self.lock_state().displayed.clone()
    }

    /// Display queued content until the stream has ended and everything
    /// queued has been shown, then resolve with the accumulated text.
    ///
    /// Resolves exactly once per message: only after `end_of_stream` and
    /// with the queue empty and no fragment mid-drain. While the stream is
    /// open and the queue is empty it idles until the next fragment.
    pub async fn drain(&self, sink: &mut dyn ContentSink) -> String {
        if self.phase() == PlaybackPhase::Finalized {
            tracing::warn!("drain called on finalized playback queue");
            return self.displayed_text();
        }

        let mut typing_hidden = false;

        loop {
            match self.next_step() {
                Step::Render(payload) => {
                    hide_typing_once(sink, &mut typing_hidden);
                    sink.render_structured(&payload);
                }
                Step::Type(fragment) => {
                    for ch in fragment.chars() {
                        if self.is_structured() {
                            // Structured content arrived mid-fragment; the
                            // rest of this text is obsolete.
                            break;
                        }
                        hide_typing_once(sink, &mut typing_hidden);
                        let mut buffer = [0_u8; 4];
                        let delta: &str = ch.encode_utf8(&mut buffer);
                        self.lock_state().displayed.push(ch);
                        sink.append_text(delta);
                        tokio::time::sleep(self.char_delay).await;
                    }
                }
                Step::Wait => self.wake.notified().await,
                Step::Done => {
                    let mut state = self.lock_state();
                    state.phase = PlaybackPhase::Finalized;
                    return state.displayed.clone();
                }
            }
        }
    }

    fn next_step(&self) -> Step {
        let mut state = self.lock_state();

        if state.structured.is_some() {
            if !state.structured_rendered {
                state.structured_rendered = true;
                let payload = state.structured.clone().unwrap_or(Value::Null);
                return Step::Render(payload);
            }
            return if state.phase == PlaybackPhase::Draining {
                Step::Done
            } else {
                Step::Wait
            };
        }

        if let Some(fragment) = state.queue.pop_front() {
            return Step::Type(fragment);
        }

        if state.phase == PlaybackPhase::Draining {
            Step::Done
        } else {
            Step::Wait
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, PlaybackState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn hide_typing_once(sink: &mut dyn ContentSink, hidden: &mut bool) {
    if !*hidden {
        sink.hide_typing();
        *hidden = true;
    }
}
