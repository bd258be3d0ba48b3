use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::GenreResponse;

/// Catalog page size assumed by the clients.
pub const PAGE_SIZE: i64 = 20;

#[derive(Debug, Clone, FromRow)]
pub struct Movie {
    pub id: i32,
    pub tmdb_id: i32,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i32>,
    pub popularity: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Ingestion-side payload; the catalog is immutable through the public API.
#[derive(Debug, Deserialize)]
pub struct CreateMovie {
    pub tmdb_id: i32,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i32>,
    pub popularity: Option<f64>,
    pub genre_ids: Vec<i32>,
}

/// Outbound movie shape. Stored records are heterogeneous (older ingested
/// rows lack backdrops, dates, or genre links), so every such field carries
/// an explicit default instead of failing serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieResponse {
    pub id: i32,
    pub tmdb_id: i32,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Always either null or `YYYY-MM-DD`, regardless of how the date is stored.
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i32>,
    pub popularity: Option<f64>,
    #[serde(default)]
    pub genres: Vec<GenreResponse>,
}

impl MovieResponse {
    pub fn from_movie(movie: Movie) -> Self {
        Self::with_genres(movie, Vec::new())
    }

    pub fn with_genres(movie: Movie, genres: Vec<GenreResponse>) -> Self {
        Self {
            id: movie.id,
            tmdb_id: movie.tmdb_id,
            title: movie.title,
            overview: movie.overview.unwrap_or_default(),
            poster_path: movie.poster_path,
            backdrop_path: movie.backdrop_path,
            release_date: movie
                .release_date
                .map(|date| date.format("%Y-%m-%d").to_string()),
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
            popularity: movie.popularity,
            genres,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub movies: Vec<MovieResponse>,
    pub total_results: i64,
}

#[derive(Debug, Serialize)]
pub struct PagedMoviesResponse {
    pub page: i64,
    pub results: Vec<MovieResponse>,
    pub total_pages: i64,
    pub total_results: i64,
}

impl PagedMoviesResponse {
    pub fn new(page: i64, results: Vec<MovieResponse>, total_results: i64) -> Self {
        Self {
            page,
            results,
            total_pages: (total_results + PAGE_SIZE - 1) / PAGE_SIZE,
            total_results,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SimilarMoviesResponse {
    pub results: Vec<MovieResponse>,
    pub total_results: i64,
}
