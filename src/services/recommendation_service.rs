use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::{Movie, MovieResponse};
use crate::services::movie_service::genres_for_movies;

#[derive(Debug, Clone)]
pub struct RecommendationService {
    db: PgPool,
}

impl RecommendationService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Movies in the user's preferred genres, minus anything already
    /// watched, ranked by popularity then vote average. Users without
    /// preferences fall back to the global ranking.
    pub async fn personalized(&self, user_id: Uuid, limit: i64) -> ApiResult<Vec<MovieResponse>> {
        let preference_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_genre_preferences WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.db)
                .await?;

        let movies = if preference_count > 0 {
            sqlx::query_as::<_, Movie>(
                "SELECT DISTINCT m.* FROM movies m \
                 JOIN movie_genres mg ON mg.movie_id = m.id \
                 JOIN user_genre_preferences p ON p.genre_id = mg.genre_id \
                 WHERE p.user_id = $1 \
                   AND NOT EXISTS \
                       (SELECT 1 FROM movie_history h \
                        WHERE h.user_id = $1 AND h.movie_id = m.id) \
                 ORDER BY m.popularity DESC NULLS LAST, m.vote_average DESC NULLS LAST \
                 LIMIT $2",
            )
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.db)
            .await?
        } else {
            sqlx::query_as::<_, Movie>(
                "SELECT m.* FROM movies m \
                 WHERE NOT EXISTS \
                     (SELECT 1 FROM movie_history h \
                      WHERE h.user_id = $1 AND h.movie_id = m.id) \
                 ORDER BY m.popularity DESC NULLS LAST, m.vote_average DESC NULLS LAST \
                 LIMIT $2",
            )
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.db)
            .await?
        };

        self.attach_genres(movies).await
    }

    pub async fn by_genre(&self, genre_id: i32, limit: i64) -> ApiResult<Vec<MovieResponse>> {
        let movies = sqlx::query_as::<_, Movie>(
            "SELECT m.* FROM movies m \
             JOIN movie_genres mg ON mg.movie_id = m.id \
             WHERE mg.genre_id = $1 \
             ORDER BY m.popularity DESC NULLS LAST, m.vote_average DESC NULLS LAST \
             LIMIT $2",
        )
        .bind(genre_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        self.attach_genres(movies).await
    }

    async fn attach_genres(&self, movies: Vec<Movie>) -> ApiResult<Vec<MovieResponse>> {
        let mut by_movie =
            genres_for_movies(&self.db, movies.iter().map(|m| m.id).collect()).await?;

        Ok(movies
            .into_iter()
            .map(|movie| {
                let genres = by_movie.remove(&movie.id).unwrap_or_default();
                MovieResponse::with_genres(movie, genres)
            })
            .collect())
    }
}
