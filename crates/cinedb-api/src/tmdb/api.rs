//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::Result;
use super::options::Options;
use super::types::{
    GenericResponse, GenreList, MovieDetails, MovieSummary, Page, RequestToken, Season, Session,
    TvDetails, TvSummary,
};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches movie details.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn movie_details(&self, movie_id: u64, options: &Options) -> Result<MovieDetails>;

    /// Fetches TV series details including the season list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn tv_details(&self, series_id: u64, options: &Options) -> Result<TvDetails>;

    /// Fetches a TV season including its episodes.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn tv_season(
        &self,
        series_id: u64,
        season_number: u32,
        options: &Options,
    ) -> Result<Season>;

    /// Searches for movies.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn search_movie(&self, query: &str, options: &Options) -> Result<Page<MovieSummary>>;

    /// Searches for TV series.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn search_tv(&self, query: &str, options: &Options) -> Result<Page<TvSummary>>;

    /// Lists movie genres.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn genre_movie_list(&self, options: &Options) -> Result<GenreList>;

    /// Lists TV genres.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn genre_tv_list(&self, options: &Options) -> Result<GenreList>;

    /// Creates a request token for the user to approve.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn request_token(&self) -> Result<RequestToken>;

    /// Exchanges an approved request token for a session id.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn create_session(&self, request_token: &str) -> Result<Session>;

    /// Invalidates the client's session id on the server.
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::MissingSession`](super::TmdbError::MissingSession)
    /// without a session id, or an error if the HTTP request fails.
    async fn delete_session(&self) -> Result<GenericResponse>;

    /// Rates a movie (0.5 to 10.0) with the client's session.
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::MissingSession`](super::TmdbError::MissingSession)
    /// without a session id, or an error if the HTTP request fails.
    async fn rate_movie(&self, movie_id: u64, value: f32) -> Result<GenericResponse>;

    /// Removes the session's rating of a movie.
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::MissingSession`](super::TmdbError::MissingSession)
    /// without a session id, or an error if the HTTP request fails.
    async fn delete_movie_rating(&self, movie_id: u64) -> Result<GenericResponse>;
}
