use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateWatchlistEntry {
    pub movie_id: i32,
}

/// One saved movie per (user, movie); enforced by a unique constraint.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct WatchlistEntryResponse {
    pub id: i32,
    pub user_id: Uuid,
    pub movie_id: i32,
    pub title: String,
    pub poster_path: Option<String>,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct WatchlistResponse {
    pub watchlist: Vec<WatchlistEntryResponse>,
}

/// Result of a toggle: reports which way it went.
#[derive(Debug, Serialize)]
pub struct WatchlistToggleResponse {
    pub movie_id: i32,
    pub in_watchlist: bool,
}
