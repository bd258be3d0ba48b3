use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::models::{CreateRating, Rating, RatingResponse};

#[derive(Debug, Clone)]
pub struct RatingService {
    db: PgPool,
}

impl RatingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Upsert keyed on (user, movie): a repeat rating replaces the value and
    /// bumps `updated_at`, leaving `created_at` untouched.
    pub async fn rate(&self, user_id: Uuid, request: CreateRating) -> ApiResult<RatingResponse> {
        request.validate()?;

        let rating = sqlx::query_as::<_, Rating>(
            "INSERT INTO ratings (user_id, movie_id, rating) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, movie_id) \
             DO UPDATE SET rating = EXCLUDED.rating, updated_at = NOW() \
             RETURNING *",
        )
        .bind(user_id)
        .bind(request.movie_id)
        .bind(request.rating)
        .fetch_one(&self.db)
        .await
        .map_err(|err| match ApiError::from(err) {
            ApiError::NotFound(_) => {
                ApiError::NotFound(format!("Movie {} not found", request.movie_id))
            }
            other => other,
        })?;

        self.rating_response(rating.id).await
    }

    pub async fn list(&self, user_id: Uuid) -> ApiResult<Vec<RatingResponse>> {
        let ratings = sqlx::query_as::<_, RatingResponse>(
            "SELECT r.id, r.user_id, r.movie_id, m.title, m.poster_path, r.rating, \
                    r.created_at, r.updated_at \
             FROM ratings r \
             JOIN movies m ON m.id = r.movie_id \
             WHERE r.user_id = $1 \
             ORDER BY r.updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(ratings)
    }

    async fn rating_response(&self, rating_id: i32) -> ApiResult<RatingResponse> {
        let response = sqlx::query_as::<_, RatingResponse>(
            "SELECT r.id, r.user_id, r.movie_id, m.title, m.poster_path, r.rating, \
                    r.created_at, r.updated_at \
             FROM ratings r \
             JOIN movies m ON m.id = r.movie_id \
             WHERE r.id = $1",
        )
        .bind(rating_id)
        .fetch_one(&self.db)
        .await?;

        Ok(response)
    }
}
