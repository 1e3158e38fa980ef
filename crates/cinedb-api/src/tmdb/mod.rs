//! TMDB API client module.
//!
//! Every endpoint call goes through one request pipeline: build the URL,
//! send with a JSON content type, optionally wait and re-send when throttled,
//! then decode either the payload or the TMDB error envelope.

mod api;
mod client;
mod endpoints;
mod error;
mod executor;
mod options;
mod retry;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT, TmdbClient, TmdbClientBuilder, TransportConfig,
};
#[allow(clippy::module_name_repetitions)]
pub use error::{ApiError, Result, TmdbError};
pub use options::{Options, fmt_options};
pub use retry::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DURATION, RetryLimit, retry_duration, should_retry,
    should_retry_read,
};
pub use tokio_util::sync::CancellationToken;
pub use types::{
    Episode, GenericResponse, Genre, GenreList, MovieDetails, MovieSummary, Page, RequestToken,
    Season, SeasonSummary, Session, TvDetails, TvSummary,
};
