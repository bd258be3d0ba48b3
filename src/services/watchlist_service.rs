use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{WatchlistEntryResponse, WatchlistResponse, WatchlistToggleResponse};

#[derive(Debug, Clone)]
pub struct WatchlistService {
    db: PgPool,
}

impl WatchlistService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Add the movie when absent, remove it when present. The unique
    /// (user, movie) constraint keeps concurrent toggles from ever storing
    /// a second entry.
    pub async fn toggle(&self, user_id: Uuid, movie_id: i32) -> ApiResult<WatchlistToggleResponse> {
        self.ensure_movie_exists(movie_id).await?;

        let removed = sqlx::query("DELETE FROM watchlist WHERE user_id = $1 AND movie_id = $2")
            .bind(user_id)
            .bind(movie_id)
            .execute(&self.db)
            .await?;

        if removed.rows_affected() > 0 {
            return Ok(WatchlistToggleResponse {
                movie_id,
                in_watchlist: false,
            });
        }

        sqlx::query(
            "INSERT INTO watchlist (user_id, movie_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, movie_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(movie_id)
        .execute(&self.db)
        .await?;

        Ok(WatchlistToggleResponse {
            movie_id,
            in_watchlist: true,
        })
    }

    pub async fn list(&self, user_id: Uuid) -> ApiResult<WatchlistResponse> {
        let watchlist = sqlx::query_as::<_, WatchlistEntryResponse>(
            "SELECT w.id, w.user_id, w.movie_id, m.title, m.poster_path, w.added_at \
             FROM watchlist w \
             JOIN movies m ON m.id = w.movie_id \
             WHERE w.user_id = $1 \
             ORDER BY w.added_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(WatchlistResponse { watchlist })
    }

    async fn ensure_movie_exists(&self, movie_id: i32) -> ApiResult<()> {
        let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM movies WHERE id = $1")
            .bind(movie_id)
            .fetch_optional(&self.db)
            .await?;

        exists
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(format!("Movie {movie_id} not found")))
    }
}
