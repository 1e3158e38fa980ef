//! TMDB error envelope and the client error type.

use std::fmt;

use reqwest::{Response, StatusCode};
use serde::Deserialize;

/// Result alias for TMDB client operations.
pub type Result<T> = std::result::Result<T, TmdbError>;

/// Error envelope returned by the TMDB API on non-success responses.
///
/// Also usable as an error value on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[allow(clippy::module_name_repetitions)]
pub struct ApiError {
    /// Human-readable message.
    #[serde(default)]
    pub status_message: String,
    /// Success flag (false for errors).
    #[serde(default)]
    pub success: bool,
    /// TMDB status code (not the HTTP status).
    #[serde(default)]
    pub status_code: u32,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "code: {} | success: {} | message: {}",
            self.status_code, self.success, self.status_message
        )
    }
}

impl std::error::Error for ApiError {}

/// Errors returned by [`TmdbClient`](super::TmdbClient).
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum TmdbError {
    /// The API key passed at construction was empty.
    #[error("API key is empty")]
    EmptyApiKey,

    /// An empty session id was supplied.
    #[error("session id is empty")]
    EmptySessionId,

    /// An account-scoped call was made without a session id.
    #[error("session id is not set")]
    MissingSession,

    /// The request URL was empty.
    #[error("url field is empty")]
    EmptyUrl,

    /// The request URL could not be parsed.
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        /// Offending URL.
        url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },

    /// Connection, DNS, TLS or timeout failure.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The request body could not be serialized.
    #[error("could not encode the request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A success response did not match the expected payload.
    #[error("could not decode the data: {0}")]
    Decode(#[source] serde_json::Error),

    /// The API answered with a structured error envelope.
    #[error("{error}")]
    Api {
        /// HTTP status of the response.
        status: StatusCode,
        /// Decoded envelope.
        error: ApiError,
    },

    /// The API answered with an error status and no body.
    #[error("[{}]: empty body {}", .status.as_u16(), .status.canonical_reason().unwrap_or_default())]
    EmptyBody {
        /// HTTP status of the response.
        status: StatusCode,
    },

    /// The API answered with an error body that is not a JSON envelope.
    #[error("couldn't decode error: ({}) [{}]", .body.len(), String::from_utf8_lossy(.body))]
    Opaque {
        /// HTTP status of the response.
        status: StatusCode,
        /// Raw response body.
        body: Vec<u8>,
    },

    /// The call was aborted through the token bound with
    /// [`TmdbClient::with_cancellation`](super::TmdbClient::with_cancellation).
    #[error("request cancelled")]
    Cancelled,
}

impl TmdbError {
    /// Returns `true` for caller mistakes detected before any network call.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::EmptyApiKey
                | Self::EmptySessionId
                | Self::MissingSession
                | Self::EmptyUrl
                | Self::InvalidUrl { .. }
        )
    }

    /// HTTP status attached to the failure, if the server responded.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } | Self::EmptyBody { status } | Self::Opaque { status, .. } => {
                Some(*status)
            }
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// The decoded TMDB envelope, for structured API failures.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Consumes a non-success response and turns it into an error.
pub(crate) async fn decode_error(response: Response) -> TmdbError {
    let status = response.status();
    match response.bytes().await {
        Ok(body) => decode_error_body(status, &body),
        Err(e) => TmdbError::Transport(e),
    }
}

/// Classifies an error body: empty, JSON envelope, or opaque bytes.
pub(crate) fn decode_error_body(status: StatusCode, body: &[u8]) -> TmdbError {
    if body.is_empty() {
        return TmdbError::EmptyBody { status };
    }

    match serde_json::from_slice::<ApiError>(body) {
        Ok(error) => TmdbError::Api { status, error },
        Err(_) => TmdbError::Opaque {
            status,
            body: body.to_vec(),
        },
    }
}
