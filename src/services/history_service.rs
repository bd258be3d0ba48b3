use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{HistoryListResponse, MovieHistory, MovieHistoryResponse};

#[derive(Debug, Clone)]
pub struct HistoryService {
    db: PgPool,
}

impl HistoryService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Append a watch event. Re-watching the same movie appends another row.
    pub async fn record(&self, user_id: Uuid, movie_id: i32) -> ApiResult<MovieHistoryResponse> {
        let entry = sqlx::query_as::<_, MovieHistory>(
            "INSERT INTO movie_history (user_id, movie_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(movie_id)
        .fetch_one(&self.db)
        .await
        .map_err(|err| match ApiError::from(err) {
            ApiError::NotFound(_) => ApiError::NotFound(format!("Movie {movie_id} not found")),
            other => other,
        })?;

        let entry = sqlx::query_as::<_, MovieHistoryResponse>(
            "SELECT h.id, h.movie_id, m.title, m.poster_path, h.watched_at \
             FROM movie_history h \
             JOIN movies m ON m.id = h.movie_id \
             WHERE h.id = $1",
        )
        .bind(entry.id)
        .fetch_one(&self.db)
        .await?;

        Ok(entry)
    }

    pub async fn list(&self, user_id: Uuid, limit: i64) -> ApiResult<HistoryListResponse> {
        let history = sqlx::query_as::<_, MovieHistoryResponse>(
            "SELECT h.id, h.movie_id, m.title, m.poster_path, h.watched_at \
             FROM movie_history h \
             JOIN movies m ON m.id = h.movie_id \
             WHERE h.user_id = $1 \
             ORDER BY h.watched_at DESC \
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(HistoryListResponse { history })
    }

    /// Remove every history row for the given movie.
    pub async fn remove(&self, user_id: Uuid, movie_id: i32) -> ApiResult<()> {
        let deleted = sqlx::query("DELETE FROM movie_history WHERE user_id = $1 AND movie_id = $2")
            .bind(user_id)
            .bind(movie_id)
            .execute(&self.db)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!(
                "Movie {movie_id} is not in the watch history"
            )));
        }

        Ok(())
    }
}
