use chat_api::{ChatApiClient, ChatApiError, ChatRequest};
use transcript_store::{Role, TranscriptEntry, TranscriptStore};
use uuid::Uuid;

use crate::config::ChatConfig;
use crate::outcome::{FallbackReason, SendOutcome};
use crate::pipeline::{resolve_fallback, resolve_finish, run_stream};
use crate::sink::ContentSink;

/// One conversation: transcript, session identity, and persistence wiring.
///
/// `send_message` takes `&mut self`, so sends are serialized per session by
/// construction; two pipelines can never race on the same transcript.
pub struct ChatSession {
    config: ChatConfig,
    client: ChatApiClient,
    store: Option<TranscriptStore>,
    history: Vec<TranscriptEntry>,
    session_id: String,
}

impl ChatSession {
    pub fn new(config: ChatConfig) -> Result<Self, ChatApiError> {
        let client = ChatApiClient::new(config.transport())?;
        let store = config.persistence.enabled.then(|| {
            TranscriptStore::new(
                &config.persistence.storage_root,
                &config.persistence.storage_key,
                config.persistence.conversation_ttl,
            )
        });

        Ok(Self {
            config,
            client,
            store,
            history: Vec::new(),
            session_id: Uuid::new_v4().to_string(),
        })
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[must_use]
    pub fn history(&self) -> &[TranscriptEntry] {
        &self.history
    }

    /// Restore the persisted conversation, if a valid unexpired record
    /// exists. Invalid or expired records were already discarded by the
    /// store; failures degrade to an empty conversation.
    pub fn restore(&mut self) -> bool {
        let Some(store) = &self.store else {
            return false;
        };

        match store.load() {
            Ok(Some(conversation)) => {
                tracing::debug!(
                    messages = conversation.message_history.len(),
                    "restored persisted conversation"
                );
                self.history = conversation.message_history;
                self.session_id = conversation.session_id;
                true
            }
            Ok(None) => false,
            Err(error) => {
                tracing::warn!(%error, "failed to load persisted conversation");
                false
            }
        }
    }

    /// Discard the transcript, issue a fresh session id, and clear the
    /// persisted record.
    pub fn start_new_chat(&mut self) {
        self.history.clear();
        self.session_id = Uuid::new_v4().to_string();

        if let Some(store) = &self.store {
            if let Err(error) = store.clear() {
                tracing::warn!(%error, "failed to clear persisted conversation");
            }
        }
    }

    /// Send one user message and play the streamed answer through `sink`.
    ///
    /// Every failure path resolves to the configured fallback sentence as
    /// the bot's transcript entry; the caller never sees an error and the
    /// sink is never left on a typing indicator.
    pub async fn send_message<S: ContentSink>(&mut self, content: &str, sink: &mut S) -> SendOutcome {
        self.commit_entry(Role::User, content);
        sink.show_typing();

        let request = ChatRequest::new(content, &self.session_id);
        let mut stream = match self.client.open_stream(&request).await {
            Ok(stream) => stream,
            Err(error) => {
                tracing::warn!(%error, request_id = %request.request_id, "chat dispatch failed");
                let (outcome, committed) = resolve_fallback(
                    &self.config,
                    FallbackReason::Dispatch(error.to_string()),
                    sink,
                );
                self.commit_entry(Role::Bot, &committed);
                return outcome;
            }
        };

        let finish = run_stream(&self.config, &mut stream, sink).await;
        stream.release();

        let (outcome, committed) = resolve_finish(&self.config, finish, sink);
        self.commit_entry(Role::Bot, &committed);
        outcome
    }

    fn commit_entry(&mut self, role: Role, content: &str) {
        self.history.push(TranscriptEntry::now(role, content));
        self.save_conversation();
    }

    fn save_conversation(&self) {
        let Some(store) = &self.store else {
            return;
        };

        if let Err(error) = store.save(&self.history, &self.session_id) {
            tracing::warn!(%error, "failed to save conversation");
        }
    }
}
