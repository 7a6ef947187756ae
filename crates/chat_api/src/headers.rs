use std::collections::BTreeMap;

use crate::config::ChatApiConfig;

pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// Accept value advertising every stream encoding the classifier understands.
pub const ACCEPT_STREAMING: &str = "text/event-stream, application/x-ndjson, application/json";

/// Build a deterministic header map for one chat request.
///
/// `request_id` doubles as the idempotency/correlation key; the server echoes
/// it in its own logs, so it is always present.
pub fn build_headers(config: &ChatApiConfig, request_id: &str) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    headers.insert(
        HEADER_CONTENT_TYPE.to_owned(),
        "application/json".to_owned(),
    );
    headers.insert(HEADER_ACCEPT.to_owned(), ACCEPT_STREAMING.to_owned());
    headers.insert(HEADER_REQUEST_ID.to_owned(), request_id.trim().to_owned());

    for (key, value) in &config.extra_headers {
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_owned());
    }

    headers
}
