use std::time::Duration;

/// Base delay before the first retry.
pub const BASE_DELAY_MS: u64 = 1000;

/// Status-code retry policy: transient server pressure only.
///
/// 4xx other than 429 is a terminal failure; retrying a malformed or
/// rejected request cannot succeed.
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..=599).contains(&status)
}

/// Exponential backoff delay applied between attempt `i` and `i + 1`.
pub fn retry_delay(attempt: u32) -> Duration {
    let exponent = attempt.min(30);
    Duration::from_millis(BASE_DELAY_MS * 2u64.saturating_pow(exponent))
}
