//! Request execution shared by every endpoint: send, retry, decode.

use std::future::Future;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use url::Url;

use super::client::TmdbClient;
use super::error::{Result, TmdbError, decode_error};
use super::retry::{RetryBudget, retry_duration, should_retry, should_retry_read};

/// Content type sent with every request.
const JSON_CONTENT_TYPE: &str = "application/json;charset=utf-8";

impl TmdbClient {
    /// Sends a GET request and decodes a `200` body into `T`.
    ///
    /// Returns `Ok(None)` for `204 No Content`. With auto retry on, only
    /// `429` is re-sent; a `202` is returned as an error.
    ///
    /// # Errors
    ///
    /// - `url` is empty or unparsable (no request is sent).
    /// - Transport failure or cancellation.
    /// - Any status other than `200`/`204` (decoded error envelope).
    /// - The `200` body does not decode into `T`.
    #[instrument(skip_all)]
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let url = parse_url(url)?;
        let response = self
            .execute(Method::GET, url, None, should_retry_read)
            .await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if status != StatusCode::OK {
            return Err(decode_error(response).await);
        }

        decode_body(response).await.map(Some)
    }

    /// Sends `body` as JSON with `method` and decodes the response into `T`.
    ///
    /// # Errors
    ///
    /// - `url` is empty or unparsable (no request is sent).
    /// - `body` cannot be serialized.
    /// - Transport failure or cancellation.
    /// - Status outside `2xx`, or `204` (decoded error envelope).
    /// - The body does not decode into `T`.
    #[instrument(skip_all, fields(method = %method))]
    pub async fn request<B, T>(&self, url: &str, body: &B, method: Method) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = parse_url(url)?;
        let payload = serde_json::to_vec(body).map_err(TmdbError::Encode)?;
        let response = self
            .execute(method, url, Some(payload), should_retry)
            .await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT || !status.is_success() {
            return Err(decode_error(response).await);
        }

        decode_body(response).await
    }

    /// Sends the request, re-sending responses matched by `retry_on` while
    /// auto retry is on and the retry limit allows it. Returns the first
    /// response that is not retried.
    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
        retry_on: fn(StatusCode) -> bool,
    ) -> Result<Response> {
        let cancel = self.active_cancellation();
        let mut budget = RetryBudget::new(self.retry_limit);

        loop {
            let mut request = self
                .http_client
                .request(method.clone(), url.clone())
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE);
            if let Some(payload) = &body {
                request = request.body(payload.clone());
            }

            tracing::debug!(%method, path = url.path(), "TMDB API request");

            let response = cancellable(cancel, request.send()).await??;
            budget.record_send();

            let status = response.status();
            if self.auto_retry && retry_on(status) {
                let delay = retry_duration(response.headers());
                if budget.allows_retry(delay) {
                    drop(response);
                    tracing::warn!(
                        code = status.as_u16(),
                        attempt = budget.sends(),
                        retry_after_secs = delay.as_secs(),
                        "TMDB API asked to wait. Retrying..."
                    );
                    cancellable(cancel, tokio::time::sleep(delay)).await?;
                    continue;
                }
                tracing::warn!(
                    code = status.as_u16(),
                    attempts = budget.sends(),
                    "TMDB API retry limit reached"
                );
            }

            tracing::debug!(code = status.as_u16(), "TMDB API response");
            return Ok(response);
        }
    }
}

/// Rejects empty URLs before anything touches the network.
fn parse_url(url: &str) -> Result<Url> {
    if url.is_empty() {
        return Err(TmdbError::EmptyUrl);
    }
    Url::parse(url).map_err(|source| TmdbError::InvalidUrl {
        url: String::from(url),
        source,
    })
}

/// Runs `fut`, aborting with [`TmdbError::Cancelled`] if `token` fires first.
async fn cancellable<F: Future>(token: Option<&CancellationToken>, fut: F) -> Result<F::Output> {
    match token {
        Some(token) => tokio::select! {
            biased;
            () = token.cancelled() => Err(TmdbError::Cancelled),
            output = fut => Ok(output),
        },
        None => Ok(fut.await),
    }
}

/// Reads the whole body and decodes it as JSON.
async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(TmdbError::Decode)
}
