use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Append-only log of movies a user has watched.
#[derive(Debug, Clone, FromRow)]
pub struct MovieHistory {
    pub id: i32,
    pub user_id: Uuid,
    pub movie_id: i32,
    pub watched_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMovieHistory {
    pub movie_id: i32,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct MovieHistoryResponse {
    pub id: i32,
    pub movie_id: i32,
    pub title: String,
    pub poster_path: Option<String>,
    pub watched_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HistoryListResponse {
    pub history: Vec<MovieHistoryResponse>,
}
