use std::collections::BTreeMap;
use std::time::Duration;

/// Transport configuration for chat streaming requests.
#[derive(Debug, Clone)]
pub struct ChatApiConfig {
    /// Endpoint receiving `POST`ed chat requests.
    pub endpoint: String,
    /// Retry attempts after the initial request attempt.
    pub retries: u32,
    /// Per-attempt deadline. Exceeding it aborts the in-flight request.
    pub timeout: Duration,
    /// Additional headers merged into every request.
    pub extra_headers: BTreeMap<String, String>,
}

pub const DEFAULT_RETRIES: u32 = 2;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(20_000);

impl Default for ChatApiConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            retries: DEFAULT_RETRIES,
            timeout: DEFAULT_TIMEOUT,
            extra_headers: BTreeMap::new(),
        }
    }
}

impl ChatApiConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn insert_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.extra_headers.extend(headers);
        self
    }
}
