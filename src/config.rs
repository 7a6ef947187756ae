use std::path::PathBuf;
use std::time::Duration;

/// Time-to-live presets for conversation persistence.
///
/// Short suits transactional sites, Medium is the recommended default,
/// Long suits B2B/complex products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlPreset {
    Short,
    Medium,
    Long,
}

impl TtlPreset {
    pub const fn duration(self) -> Duration {
        match self {
            Self::Short => Duration::from_secs(24 * 60 * 60),
            Self::Medium => Duration::from_secs(3 * 24 * 60 * 60),
            Self::Long => Duration::from_secs(7 * 24 * 60 * 60),
        }
    }

    /// Parse a preset name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "SHORT" => Some(Self::Short),
            "MEDIUM" => Some(Self::Medium),
            "LONG" => Some(Self::Long),
            _ => None,
        }
    }
}

/// Conversation persistence settings.
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    pub enabled: bool,
    pub conversation_ttl: Duration,
    /// Storage record key; becomes the record file name.
    pub storage_key: String,
    /// Directory holding conversation records.
    pub storage_root: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            conversation_ttl: TtlPreset::Medium.duration(),
            storage_key: "chat_conversation".to_owned(),
            storage_root: PathBuf::from("."),
        }
    }
}

/// Rich-content rendering flags consumed by the pipeline.
///
/// With cards disabled a structured payload degrades to its title and
/// description through the plain-text path instead of rendering atomically.
#[derive(Debug, Clone, Copy)]
pub struct RichContentConfig {
    pub enable_rich_content: bool,
    pub enable_cards: bool,
}

impl Default for RichContentConfig {
    fn default() -> Self {
        Self {
            enable_rich_content: true,
            enable_cards: true,
        }
    }
}

impl RichContentConfig {
    pub fn cards_enabled(&self) -> bool {
        self.enable_rich_content && self.enable_cards
    }
}

/// Immutable configuration injected into the dispatcher, scheduler, and
/// session constructors.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Endpoint receiving `POST`ed chat requests.
    pub api_endpoint: String,
    /// Retry attempts after the initial request attempt.
    pub retries: u32,
    /// Per-attempt request deadline, milliseconds.
    pub timeout_ms: u64,
    /// Typewriter cadence: delay per displayed character, milliseconds.
    pub stream_char_delay_ms: u64,
    /// Whole-stream deadline from dispatch through drain, milliseconds.
    pub stream_timeout_ms: u64,
    /// Bot message substituted when a send cannot produce content.
    pub fallback_response: String,
    pub persistence: PersistenceConfig,
    pub rich_content: RichContentConfig,
}

pub const DEFAULT_STREAM_CHAR_DELAY_MS: u64 = 5;
pub const DEFAULT_STREAM_TIMEOUT_MS: u64 = 30_000;

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_endpoint: String::new(),
            retries: chat_api::config::DEFAULT_RETRIES,
            timeout_ms: chat_api::config::DEFAULT_TIMEOUT.as_millis() as u64,
            stream_char_delay_ms: DEFAULT_STREAM_CHAR_DELAY_MS,
            stream_timeout_ms: DEFAULT_STREAM_TIMEOUT_MS,
            fallback_response:
                "I'm sorry, I'm having trouble connecting right now. Please try again in a moment."
                    .to_owned(),
            persistence: PersistenceConfig::default(),
            rich_content: RichContentConfig::default(),
        }
    }
}

impl ChatConfig {
    pub fn new(api_endpoint: impl Into<String>) -> Self {
        Self {
            api_endpoint: api_endpoint.into(),
            ..Self::default()
        }
    }

    pub(crate) fn transport(&self) -> chat_api::ChatApiConfig {
        chat_api::ChatApiConfig::new(self.api_endpoint.clone())
            .with_retries(self.retries)
            .with_timeout(Duration::from_millis(self.timeout_ms))
    }

    pub(crate) fn char_delay(&self) -> Duration {
        Duration::from_millis(self.stream_char_delay_ms)
    }

    pub(crate) fn stream_timeout(&self) -> Duration {
        Duration::from_millis(self.stream_timeout_ms)
    }
}
