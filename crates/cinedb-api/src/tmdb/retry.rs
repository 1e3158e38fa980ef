//! Retry policy for throttled TMDB responses.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use tokio::time::Instant;

/// Wait applied when `Retry-After` is missing or unusable.
pub const DEFAULT_RETRY_DURATION: Duration = Duration::from_secs(5);

/// Default cap on sends per call when auto retry is enabled.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Returns `true` for statuses that ask the caller to come back later
/// (`202 Accepted` and `429 Too Many Requests`).
#[must_use]
pub fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::ACCEPTED || status == StatusCode::TOO_MANY_REQUESTS
}

/// Retry rule for GET: only `429 Too Many Requests`.
#[must_use]
pub fn should_retry_read(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
}

/// Reads the `Retry-After` header as whole seconds.
///
/// Falls back to [`DEFAULT_RETRY_DURATION`] when the header is absent or
/// is not a non-negative integer.
#[must_use]
pub fn retry_duration(headers: &HeaderMap) -> Duration {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .map_or(DEFAULT_RETRY_DURATION, Duration::from_secs)
}

/// Upper bound on how long a single call keeps retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryLimit {
    /// Retry until a non-retryable status arrives or the call is cancelled.
    Unbounded,
    /// Total number of sends per call, including the first one.
    Attempts(u32),
    /// Wall-clock budget per call, including retry sleeps.
    Elapsed(Duration),
}

impl Default for RetryLimit {
    fn default() -> Self {
        Self::Attempts(DEFAULT_MAX_ATTEMPTS)
    }
}

/// Per-call bookkeeping against a [`RetryLimit`].
#[derive(Debug)]
pub(crate) struct RetryBudget {
    limit: RetryLimit,
    sends: u32,
    started: Instant,
}

impl RetryBudget {
    pub(crate) fn new(limit: RetryLimit) -> Self {
        Self {
            limit,
            sends: 0,
            started: Instant::now(),
        }
    }

    pub(crate) const fn record_send(&mut self) {
        self.sends = self.sends.saturating_add(1);
    }

    pub(crate) const fn sends(&self) -> u32 {
        self.sends
    }

    /// Whether another send may follow after sleeping for `delay`.
    pub(crate) fn allows_retry(&self, delay: Duration) -> bool {
        match self.limit {
            RetryLimit::Unbounded => true,
            RetryLimit::Attempts(max) => self.sends < max,
            RetryLimit::Elapsed(max) => self.started.elapsed().saturating_add(delay) <= max,
        }
    }
}
