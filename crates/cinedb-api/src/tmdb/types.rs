//! TMDB request bodies and response payloads.
//!
//! Response types derive `Default`: a `204 No Content` on a read yields the
//! empty value, and missing fields fall back to their defaults.

use serde::{Deserialize, Serialize};

// --- Shared ---

/// One page of results, as returned by search endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Page<T> {
    /// Current page number.
    pub page: u32,
    /// Results on this page.
    pub results: Vec<T>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
}

/// Genre entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Response from `genre/movie/list` and `genre/tv/list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenreList {
    /// Genres.
    pub genres: Vec<Genre>,
}

/// Minimal acknowledgement returned by write endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenericResponse {
    /// TMDB status code.
    pub status_code: u32,
    /// Status message.
    pub status_message: String,
    /// Success flag (not sent by every endpoint).
    pub success: bool,
}

// --- Movies ---

/// A movie as listed in search results.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    pub original_title: String,
    /// Original language (ISO 639-1).
    pub original_language: String,
    /// Release date (YYYY-MM-DD).
    pub release_date: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Popularity score.
    pub popularity: f64,
    /// Vote average.
    pub vote_average: f64,
    /// Vote count.
    pub vote_count: u32,
    /// Genre IDs.
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    pub adult: bool,
    /// Poster image path.
    pub poster_path: Option<String>,
}

/// Response from `movie/{movie_id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// IMDb ID.
    pub imdb_id: Option<String>,
    /// Localized title.
    pub title: String,
    /// Original title.
    pub original_title: String,
    /// Original language (ISO 639-1).
    pub original_language: String,
    /// Tagline.
    pub tagline: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Release date (YYYY-MM-DD).
    pub release_date: Option<String>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Release status (e.g. "Released").
    pub status: Option<String>,
    /// Budget in USD.
    pub budget: u64,
    /// Revenue in USD.
    pub revenue: u64,
    /// Genres.
    pub genres: Vec<Genre>,
    /// Popularity score.
    pub popularity: f64,
    /// Vote average.
    pub vote_average: f64,
    /// Vote count.
    pub vote_count: u32,
    /// Adult flag.
    pub adult: bool,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

// --- TV ---

/// A TV series as listed in search results.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TvSummary {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Original name.
    pub original_name: String,
    /// Original language (ISO 639-1).
    pub original_language: String,
    /// Origin countries (ISO 3166-1).
    pub origin_country: Vec<String>,
    /// First air date.
    pub first_air_date: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Popularity score.
    pub popularity: f64,
    /// Vote average.
    pub vote_average: f64,
    /// Vote count.
    pub vote_count: u32,
    /// Genre IDs.
    pub genre_ids: Vec<u32>,
    /// Poster image path.
    pub poster_path: Option<String>,
}

/// Response from `tv/{series_id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TvDetails {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Original name.
    pub original_name: String,
    /// Original language (ISO 639-1).
    pub original_language: String,
    /// Origin countries (ISO 3166-1).
    pub origin_country: Vec<String>,
    /// First air date.
    pub first_air_date: Option<String>,
    /// Last air date.
    pub last_air_date: Option<String>,
    /// Total number of episodes.
    pub number_of_episodes: u32,
    /// Total number of seasons.
    pub number_of_seasons: u32,
    /// Season summaries.
    pub seasons: Vec<SeasonSummary>,
    /// Status (e.g. "Returning Series", "Ended").
    pub status: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Genres.
    pub genres: Vec<Genre>,
    /// Whether the show is still in production.
    pub in_production: bool,
    /// Vote average.
    pub vote_average: f64,
    /// Poster image path.
    pub poster_path: Option<String>,
}

/// Season entry inside [`TvDetails`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SeasonSummary {
    /// TMDB season ID.
    pub id: u64,
    /// Season number (0 = specials).
    pub season_number: u32,
    /// Number of episodes.
    pub episode_count: u32,
    /// Air date.
    pub air_date: Option<String>,
    /// Season name.
    pub name: String,
}

/// Response from `tv/{series_id}/season/{season_number}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Season {
    /// TMDB season ID.
    pub id: u64,
    /// Season number.
    pub season_number: u32,
    /// Season name.
    pub name: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Air date.
    pub air_date: Option<String>,
    /// Episodes.
    pub episodes: Vec<Episode>,
}

/// Episode inside a [`Season`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Episode {
    /// TMDB episode ID.
    pub id: u64,
    /// Episode number within the season.
    pub episode_number: u32,
    /// Season number.
    pub season_number: u32,
    /// Episode name.
    pub name: String,
    /// Overview text.
    pub overview: Option<String>,
    /// Air date.
    pub air_date: Option<String>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Vote average.
    pub vote_average: f64,
}

// --- Authentication ---

/// Response from `authentication/token/new`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RequestToken {
    /// Success flag.
    pub success: bool,
    /// Token expiry (UTC, as sent by TMDB).
    pub expires_at: String,
    /// The request token to be approved by the user.
    pub request_token: String,
}

/// Response from `authentication/session/new`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Session {
    /// Success flag.
    pub success: bool,
    /// Newly created session id.
    pub session_id: String,
}

/// Body for `authentication/session/new`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SessionRequest<'a> {
    pub request_token: &'a str,
}

/// Body for `DELETE authentication/session`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct DeleteSessionRequest<'a> {
    pub session_id: &'a str,
}

/// Body for `movie/{movie_id}/rating`.
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct RatingRequest {
    pub value: f32,
}

/// Empty JSON object body.
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct NoBody {}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_parse_search_movie_page() {
        // Arrange
        let json = r#"{
            "page": 1,
            "results": [{
                "adult": false,
                "genre_ids": [16, 12],
                "id": 916224,
                "original_language": "ja",
                "original_title": "すずめの戸締まり",
                "overview": "Suzume, 17, lives a quiet life.",
                "popularity": 57.3,
                "poster_path": "/vIeu8WysZrTSFb2uhPViKjX9EcC.jpg",
                "release_date": "2022-11-11",
                "title": "Suzume",
                "video": false,
                "vote_average": 7.8,
                "vote_count": 1810
            }],
            "total_pages": 1,
            "total_results": 1
        }"#;

        // Act
        let page: Page<MovieSummary> = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(page.total_results, 1);
        let first = &page.results[0];
        assert_eq!(first.id, 916_224);
        assert_eq!(first.original_language, "ja");
        assert_eq!(first.release_date.as_deref(), Some("2022-11-11"));
    }

    #[test]
    fn test_parse_tv_details_with_missing_fields() {
        // Arrange
        let json = r#"{
            "id": 120089,
            "name": "SPY×FAMILY",
            "number_of_seasons": 2,
            "seasons": [
                {"id": 1, "season_number": 1, "episode_count": 25, "name": "Season 1"},
                {"id": 2, "season_number": 2, "episode_count": 12, "name": "Season 2"}
            ]
        }"#;

        // Act
        let details: TvDetails = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(details.id, 120_089);
        assert_eq!(details.name, "SPY×FAMILY");
        assert_eq!(details.seasons.len(), 2);
        assert!(details.genres.is_empty());
        assert!(details.status.is_none());
    }

    #[test]
    fn test_parse_generic_response() {
        // Arrange
        let json = r#"{"success":true,"status_code":13,"status_message":"The item/record was deleted successfully."}"#;

        // Act
        let response: GenericResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert!(response.success);
        assert_eq!(response.status_code, 13);
    }

    #[test]
    fn test_serialize_request_bodies() {
        // Arrange & Act
        let rating = serde_json::to_string(&RatingRequest { value: 8.5 }).unwrap();
        let session = serde_json::to_string(&SessionRequest {
            request_token: "tok",
        })
        .unwrap();
        let empty = serde_json::to_string(&NoBody {}).unwrap();

        // Assert
        assert_eq!(rating, r#"{"value":8.5}"#);
        assert_eq!(session, r#"{"request_token":"tok"}"#);
        assert_eq!(empty, "{}");
    }
}
