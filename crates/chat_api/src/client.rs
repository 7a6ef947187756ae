use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, StatusCode};

use crate::config::ChatApiConfig;
use crate::error::{error_body_message, ChatApiError};
use crate::headers::build_headers;
use crate::payload::ChatRequest;
use crate::retry::{is_retryable_status, retry_delay};
use crate::stream::EventStream;

/// Resilient dispatcher for the chat streaming endpoint.
#[derive(Debug)]
pub struct ChatApiClient {
    http: Client,
    config: ChatApiConfig,
}

impl ChatApiClient {
    pub fn new(config: ChatApiConfig) -> Result<Self, ChatApiError> {
        if config.endpoint.trim().is_empty() {
            return Err(ChatApiError::MissingEndpoint);
        }

        let http = Client::builder().build().map_err(ChatApiError::from)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ChatApiConfig {
        &self.config
    }

    pub fn build_request(&self, request: &ChatRequest) -> Result<reqwest::RequestBuilder, ChatApiError> {
        let headers = self.header_map(&request.request_id)?;
        Ok(self
            .http
            .post(self.config.endpoint.trim())
            .headers(headers)
            .json(request))
    }

    fn header_map(&self, request_id: &str) -> Result<HeaderMap, ChatApiError> {
        let mut out = HeaderMap::new();
        for (key, value) in build_headers(&self.config, request_id) {
            out.insert(
                HeaderName::from_bytes(key.as_bytes())
                    .map_err(|_| ChatApiError::InvalidHeader(format!("invalid header key: {key}")))?,
                HeaderValue::from_str(&value).map_err(|_| {
                    ChatApiError::InvalidHeader(format!("invalid header value for {key}"))
                })?,
            );
        }
        Ok(out)
    }

    /// Dispatch with per-attempt timeout and exponential backoff.
    ///
    /// Retries only transport failures, per-attempt timeouts, and 5xx/429
    /// responses; any other 4xx is terminal. Backoff runs strictly between
    /// attempts, never after the last, and exhaustion surfaces the last
    /// error observed.
    pub async fn send_with_retry(&self, request: &ChatRequest) -> Result<Response, ChatApiError> {
        let mut last_status: Option<StatusCode> = None;
        let mut last_error: Option<String> = None;

        for attempt in 0..=self.config.retries {
            // The attempt deadline covers time-to-response only; body
            // streaming is bounded by the caller's whole-stream deadline.
            let send = self.build_request(request)?.send();
            let response = match tokio::time::timeout(self.config.timeout, send).await {
                Ok(response) => response.map_err(ChatApiError::from),
                Err(_elapsed) => Err(ChatApiError::Timeout),
            };

            match response {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    let message = error_body_message(status, &body);
                    last_status = Some(status);
                    last_error = Some(message.clone());

                    if !is_retryable_status(status.as_u16()) {
                        return Err(ChatApiError::Status(status, message));
                    }
                    if attempt == self.config.retries {
                        return Err(ChatApiError::Status(status, message));
                    }
                }
                Err(error) => {
                    last_error = Some(error.to_string());

                    if !error.is_transport() {
                        return Err(error);
                    }
                    if attempt == self.config.retries {
                        return Err(ChatApiError::RetryExhausted {
                            status: last_status,
                            last_error,
                        });
                    }
                }
            }

            tracing::debug!(attempt, "chat request attempt failed, backing off");
            tokio::time::sleep(retry_delay(attempt)).await;
        }

        Err(ChatApiError::RetryExhausted {
            status: last_status,
            last_error,
        })
    }

    /// Dispatch and wrap the response body as a classified event stream.
    pub async fn open_stream(&self, request: &ChatRequest) -> Result<EventStream, ChatApiError> {
        let response = self.send_with_retry(request).await?;
        Ok(EventStream::from_response(response))
    }
}
