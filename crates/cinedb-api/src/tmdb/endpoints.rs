//! `LocalTmdbApi` implementation for `TmdbClient`.

use reqwest::Method;
use tracing::instrument;

use super::api::LocalTmdbApi;
use super::client::TmdbClient;
use super::error::{Result, TmdbError};
use super::options::Options;
use super::types::{
    DeleteSessionRequest, GenericResponse, GenreList, MovieDetails, MovieSummary, NoBody, Page,
    RatingRequest, RequestToken, Season, Session, SessionRequest, TvDetails, TvSummary,
};

const MOVIE_PATH: &str = "/movie/";
const TV_PATH: &str = "/tv/";
const SEASON_PATH: &str = "/season/";
const SEARCH_MOVIE_PATH: &str = "/search/movie";
const SEARCH_TV_PATH: &str = "/search/tv";
const GENRE_MOVIE_PATH: &str = "/genre/movie/list";
const GENRE_TV_PATH: &str = "/genre/tv/list";
const TOKEN_PATH: &str = "/authentication/token/new";
const SESSION_NEW_PATH: &str = "/authentication/session/new";
const SESSION_PATH: &str = "/authentication/session";

impl TmdbClient {
    /// GET that treats `204 No Content` as the payload's empty value.
    async fn fetch<T>(&self, url: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        Ok(self.get(url).await?.unwrap_or_default())
    }

    /// Appends the URL-encoded `query` parameter used by search endpoints.
    fn search_url(&self, path: &str, query: &str, options: &Options) -> String {
        format!(
            "{}&query={}",
            self.endpoint_url(path, options),
            urlencoding::encode(query)
        )
    }
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn movie_details(&self, movie_id: u64, options: &Options) -> Result<MovieDetails> {
        let url = self.endpoint_url(&format!("{MOVIE_PATH}{movie_id}"), options);
        self.fetch(&url).await
    }

    #[instrument(skip_all, fields(series_id = series_id))]
    async fn tv_details(&self, series_id: u64, options: &Options) -> Result<TvDetails> {
        let url = self.endpoint_url(&format!("{TV_PATH}{series_id}"), options);
        self.fetch(&url).await
    }

    #[instrument(skip_all, fields(series_id = series_id, season_number = season_number))]
    async fn tv_season(
        &self,
        series_id: u64,
        season_number: u32,
        options: &Options,
    ) -> Result<Season> {
        let path = format!("{TV_PATH}{series_id}{SEASON_PATH}{season_number}");
        let url = self.endpoint_url(&path, options);
        self.fetch(&url).await
    }

    #[instrument(skip_all)]
    async fn search_movie(&self, query: &str, options: &Options) -> Result<Page<MovieSummary>> {
        let url = self.search_url(SEARCH_MOVIE_PATH, query, options);
        self.fetch(&url).await
    }

    #[instrument(skip_all)]
    async fn search_tv(&self, query: &str, options: &Options) -> Result<Page<TvSummary>> {
        let url = self.search_url(SEARCH_TV_PATH, query, options);
        self.fetch(&url).await
    }

    #[instrument(skip_all)]
    async fn genre_movie_list(&self, options: &Options) -> Result<GenreList> {
        let url = self.endpoint_url(GENRE_MOVIE_PATH, options);
        self.fetch(&url).await
    }

    #[instrument(skip_all)]
    async fn genre_tv_list(&self, options: &Options) -> Result<GenreList> {
        let url = self.endpoint_url(GENRE_TV_PATH, options);
        self.fetch(&url).await
    }

    #[instrument(skip_all)]
    async fn request_token(&self) -> Result<RequestToken> {
        let url = self.endpoint_url(TOKEN_PATH, &Options::new());
        self.fetch(&url).await
    }

    #[instrument(skip_all)]
    async fn create_session(&self, request_token: &str) -> Result<Session> {
        let url = self.endpoint_url(SESSION_NEW_PATH, &Options::new());
        let body = SessionRequest { request_token };
        self.request(&url, &body, Method::POST).await
    }

    #[instrument(skip_all)]
    async fn delete_session(&self) -> Result<GenericResponse> {
        let session_id = self.session_id().ok_or(TmdbError::MissingSession)?;
        let url = self.endpoint_url(SESSION_PATH, &Options::new());
        let body = DeleteSessionRequest { session_id };
        self.request(&url, &body, Method::DELETE).await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn rate_movie(&self, movie_id: u64, value: f32) -> Result<GenericResponse> {
        let url = self.session_url(&format!("{MOVIE_PATH}{movie_id}/rating"), &Options::new())?;
        self.request(&url, &RatingRequest { value }, Method::POST)
            .await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn delete_movie_rating(&self, movie_id: u64) -> Result<GenericResponse> {
        let url = self.session_url(&format!("{MOVIE_PATH}{movie_id}/rating"), &Options::new())?;
        self.request(&url, &NoBody {}, Method::DELETE).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> TmdbClient {
        let base_url = format!("{}/3/", server.uri());
        TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_key("test-key")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_movie_details_via_http() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/movie/550"))
            .and(query_param("api_key", "test-key"))
            .and(query_param("language", "en-US"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 550,
                "title": "Fight Club",
                "original_title": "Fight Club",
                "runtime": 139,
                "genres": [{"id": 18, "name": "Drama"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server);
        let options = Options::from([(String::from("language"), String::from("en-US"))]);

        // Act
        let details = client.movie_details(550, &options).await.unwrap();

        // Assert
        assert_eq!(details.id, 550);
        assert_eq!(details.runtime, Some(139));
        assert_eq!(details.genres[0].name, "Drama");
    }

    #[tokio::test]
    async fn test_tv_season_via_http() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/tv/120089/season/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 131_836,
                "season_number": 1,
                "episodes": [
                    {"id": 1, "episode_number": 1, "season_number": 1, "name": "OPERATION STRIX"}
                ]
            })))
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let season = client.tv_season(120_089, 1, &Options::new()).await.unwrap();

        // Assert
        assert_eq!(season.season_number, 1);
        assert_eq!(season.episodes[0].name, "OPERATION STRIX");
    }

    #[tokio::test]
    async fn test_tv_details_no_content_yields_default() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/tv/1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let details = client.tv_details(1, &Options::new()).await.unwrap();

        // Assert
        assert_eq!(details, TvDetails::default());
    }

    #[tokio::test]
    async fn test_search_movie_encodes_query() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/search/movie"))
            .and(query_param("query", "すずめの戸締まり"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [{"id": 916_224, "title": "Suzume", "original_language": "ja"}],
                "total_pages": 1,
                "total_results": 1
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let page = client
            .search_movie("すずめの戸締まり", &Options::new())
            .await
            .unwrap();

        // Assert
        assert_eq!(page.results[0].id, 916_224);
    }

    #[tokio::test]
    async fn test_search_tv_error_envelope() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string(
                r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#,
            ))
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let err = client
            .search_tv("test", &Options::new())
            .await
            .unwrap_err();

        // Assert
        assert_eq!(err.api_error().unwrap().status_code, 7);
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_genre_movie_list_via_http() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/genre/movie/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "genres": [{"id": 28, "name": "Action"}, {"id": 16, "name": "Animation"}]
            })))
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let list = client.genre_movie_list(&Options::new()).await.unwrap();

        // Assert
        assert_eq!(list.genres.len(), 2);
        assert_eq!(list.genres[1].name, "Animation");
    }

    #[tokio::test]
    async fn test_create_session_posts_request_token() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/3/authentication/session/new"))
            .and(body_json(json!({"request_token": "approved"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "session_id": "79191836ddaa0da3df76a5ffef6f07ad6ab0c641"
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let session = client.create_session("approved").await.unwrap();

        // Assert
        assert!(session.success);
        assert_eq!(session.session_id, "79191836ddaa0da3df76a5ffef6f07ad6ab0c641");
    }

    #[tokio::test]
    async fn test_rate_movie_sends_session_id() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/3/movie/550/rating"))
            .and(query_param("session_id", "sid"))
            .and(body_json(json!({"value": 8.5})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "status_code": 1,
                "status_message": "Success."
            })))
            .expect(1)
            .mount(&server)
            .await;
        let mut client = client_for(&server);
        client.set_session_id("sid").unwrap();

        // Act
        let response = client.rate_movie(550, 8.5).await.unwrap();

        // Assert
        assert_eq!(response.status_code, 1);
    }

    #[tokio::test]
    async fn test_rate_movie_without_session_sends_nothing() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let result = client.rate_movie(550, 8.5).await;

        // Assert
        assert!(matches!(result, Err(TmdbError::MissingSession)));
    }

    #[tokio::test]
    async fn test_delete_movie_rating_via_http() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/3/movie/550/rating"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status_code": 13,
                "status_message": "The item/record was deleted successfully."
            })))
            .expect(1)
            .mount(&server)
            .await;
        let mut client = client_for(&server);
        client.set_session_id("sid").unwrap();

        // Act
        let response = client.delete_movie_rating(550).await.unwrap();

        // Assert
        assert_eq!(response.status_code, 13);
    }

    #[tokio::test]
    async fn test_delete_session_sends_session_in_body() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/3/authentication/session"))
            .and(body_json(json!({"session_id": "sid"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;
        let mut client = client_for(&server);
        client.set_session_id("sid").unwrap();

        // Act
        let response = client.delete_session().await.unwrap();

        // Assert
        assert!(response.success);
    }
}
