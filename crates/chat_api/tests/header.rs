use chat_api::headers::{build_headers, ACCEPT_STREAMING, HEADER_ACCEPT, HEADER_CONTENT_TYPE, HEADER_REQUEST_ID};
use chat_api::ChatApiConfig;

#[test]
fn headers_carry_streaming_accept_and_correlation_id() {
    let config = ChatApiConfig::new("https://chat.example.dev");
    let headers = build_headers(&config, "sess-1-1700000000000");

    assert_eq!(headers.get(HEADER_CONTENT_TYPE).map(String::as_str), Some("application/json"));
    assert_eq!(headers.get(HEADER_ACCEPT).map(String::as_str), Some(ACCEPT_STREAMING));
    assert_eq!(
        headers.get(HEADER_REQUEST_ID).map(String::as_str),
        Some("sess-1-1700000000000")
    );
}

#[test]
fn extra_headers_merge_lowercased() {
    let config = ChatApiConfig::new("https://chat.example.dev")
        .insert_header("X-Widget-Version", "1.0.0")
        .insert_header(" Authorization ", " Bearer token ");
    let headers = build_headers(&config, "rid");

    assert_eq!(headers.get("x-widget-version").map(String::as_str), Some("1.0.0"));
    assert_eq!(headers.get("authorization").map(String::as_str), Some("Bearer token"));
}

#[test]
fn extra_headers_may_override_defaults() {
    let config = ChatApiConfig::new("https://chat.example.dev")
        .insert_header("accept", "application/json");
    let headers = build_headers(&config, "rid");

    assert_eq!(headers.get(HEADER_ACCEPT).map(String::as_str), Some("application/json"));
}
