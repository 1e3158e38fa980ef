//! API client library for cinedb.
//!
//! Provides a client for the TMDB (The Movie Database) v3 API.

/// TMDB API client.
pub mod tmdb;
