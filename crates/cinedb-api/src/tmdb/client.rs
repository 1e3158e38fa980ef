//! `TmdbClient` - handle holding credentials, retry toggles and the HTTP transport.

use std::time::Duration;

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::error::{Result, TmdbError};
use super::options::{Options, fmt_options};
use super::retry::RetryLimit;

/// Default base URL for TMDB API v3.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Request timeout used when the transport config leaves it unset.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// User-Agent sent when none is configured.
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP transport settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportConfig {
    /// Per-request timeout (default: 10s; zero also means default).
    pub timeout: Option<Duration>,
    /// TCP connect timeout.
    pub connect_timeout: Option<Duration>,
    /// User-Agent header.
    pub user_agent: Option<String>,
}

impl TransportConfig {
    /// Creates an empty config (all defaults).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            user_agent: None,
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the User-Agent.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Timeout actually applied to each request.
    #[must_use]
    pub fn effective_timeout(&self) -> Duration {
        self.timeout
            .filter(|t| !t.is_zero())
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    fn build_http_client(&self) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(self.effective_timeout())
            .user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
            .gzip(true);
        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        builder.build().map_err(TmdbError::Transport)
    }
}

/// TMDB API client handle.
///
/// Configuration setters take `&mut self`, so the borrow checker rules out
/// changing settings while calls are in flight. Calls themselves only need
/// `&self` and may run concurrently. Cloning shares the HTTP connection pool.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client, rebuilt whenever the transport config changes.
    pub(crate) http_client: Client,
    /// Transport settings `http_client` was built from.
    transport: TransportConfig,
    /// Base URL without trailing slash.
    base_url: String,
    /// API key sent as the `api_key` query parameter.
    api_key: String,
    /// Session id for account-scoped calls.
    session_id: Option<String>,
    /// Re-send throttled requests.
    pub(crate) auto_retry: bool,
    /// Cap on retries per call.
    pub(crate) retry_limit: RetryLimit,
    /// Honour the token bound through [`TmdbClient::with_cancellation`].
    pub(crate) context_propagation: bool,
    /// Caller token bound to this handle.
    pub(crate) cancellation: Option<CancellationToken>,
}

/// Builder for `TmdbClient`.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    session_id: Option<String>,
    transport: TransportConfig,
    auto_retry: bool,
    retry_limit: Option<RetryLimit>,
    context_propagation: bool,
}

impl TmdbClientBuilder {
    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the session id.
    #[must_use]
    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    /// Sets the transport config.
    #[must_use]
    pub fn transport(mut self, config: TransportConfig) -> Self {
        self.transport = config;
        self
    }

    /// Enables retry on `429` (and `202` for body verbs).
    #[must_use]
    pub const fn auto_retry(mut self) -> Self {
        self.auto_retry = true;
        self
    }

    /// Sets the retry limit (default: 5 attempts).
    #[must_use]
    pub const fn retry_limit(mut self, limit: RetryLimit) -> Self {
        self.retry_limit = Some(limit);
        self
    }

    /// Makes calls honour tokens bound with [`TmdbClient::with_cancellation`].
    #[must_use]
    pub const fn context_propagation(mut self) -> Self {
        self.context_propagation = true;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or empty.
    /// - `session_id` is set but empty.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or(TmdbError::EmptyApiKey)?;

        if self.session_id.as_deref().is_some_and(str::is_empty) {
            return Err(TmdbError::EmptySessionId);
        }

        let base_url = self.base_url.map_or_else(
            || String::from(DEFAULT_BASE_URL),
            |url| String::from(url.as_str().trim_end_matches('/')),
        );

        let http_client = self.transport.build_http_client()?;

        Ok(TmdbClient {
            http_client,
            transport: self.transport,
            base_url,
            api_key,
            session_id: self.session_id,
            auto_retry: self.auto_retry,
            retry_limit: self.retry_limit.unwrap_or_default(),
            context_propagation: self.context_propagation,
            cancellation: None,
        })
    }
}

impl TmdbClient {
    /// Creates a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::EmptyApiKey`] if `api_key` is empty, or a
    /// transport error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::default()
    }

    /// Sets the session id used by account-scoped calls.
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::EmptySessionId`] if `id` is empty.
    pub fn set_session_id(&mut self, id: impl Into<String>) -> Result<()> {
        let id = id.into();
        if id.is_empty() {
            return Err(TmdbError::EmptySessionId);
        }
        self.session_id = Some(id);
        Ok(())
    }

    /// Replaces the transport settings.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be built; the
    /// previous transport stays in place.
    pub fn set_transport_config(&mut self, config: TransportConfig) -> Result<()> {
        self.http_client = config.build_http_client()?;
        self.transport = config;
        Ok(())
    }

    /// Enables retry on `429` (and `202` for body verbs). There is no way
    /// to turn it back off.
    pub const fn enable_auto_retry(&mut self) {
        self.auto_retry = true;
    }

    /// Sets the retry limit.
    pub const fn set_retry_limit(&mut self, limit: RetryLimit) {
        self.retry_limit = limit;
    }

    /// Makes calls honour tokens bound with [`Self::with_cancellation`].
    pub const fn enable_context_propagation(&mut self) {
        self.context_propagation = true;
    }

    /// Returns a handle whose calls abort with [`TmdbError::Cancelled`] once
    /// `token` is cancelled.
    ///
    /// Only the returned handle is bound: `self` and other scopes keep
    /// working after the cancel. The token is ignored unless context
    /// propagation is enabled.
    #[must_use]
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancellation: Some(token),
            ..self.clone()
        }
    }

    /// Token bound to this handle, if any.
    #[must_use]
    pub const fn cancellation_token(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    /// Token the executor races calls against.
    pub(crate) fn active_cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation
            .as_ref()
            .filter(|_| self.context_propagation)
    }

    /// Current session id.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Whether auto retry is enabled.
    #[must_use]
    pub const fn auto_retry(&self) -> bool {
        self.auto_retry
    }

    /// Whether context propagation is enabled.
    #[must_use]
    pub const fn context_propagation(&self) -> bool {
        self.context_propagation
    }

    /// Current retry limit.
    #[must_use]
    pub const fn retry_limit(&self) -> RetryLimit {
        self.retry_limit
    }

    /// Current transport settings.
    #[must_use]
    pub const fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    /// Base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds `{base}{path}?api_key=...{options}`.
    pub(crate) fn endpoint_url(&self, path: &str, options: &Options) -> String {
        format!(
            "{}{}?api_key={}{}",
            self.base_url,
            path,
            urlencoding::encode(&self.api_key),
            fmt_options(options)
        )
    }

    /// Like [`Self::endpoint_url`], with the `session_id` parameter appended.
    pub(crate) fn session_url(&self, path: &str, options: &Options) -> Result<String> {
        let session_id = self.session_id.as_deref().ok_or(TmdbError::MissingSession)?;
        Ok(format!(
            "{}&session_id={}",
            self.endpoint_url(path, options),
            urlencoding::encode(session_id)
        ))
    }
}
