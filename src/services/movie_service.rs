use std::collections::HashMap;

use sqlx::PgPool;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    CreateMovie, Genre, GenreResponse, Movie, MovieListResponse, MovieResponse,
    PagedMoviesResponse, SimilarMoviesResponse, PAGE_SIZE,
};

#[derive(Debug, Clone)]
pub struct MovieService {
    db: PgPool,
}

impl MovieService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Ingest a catalog entry. Not exposed over the public API; used by the
    /// ingestion pipeline and by tests.
    pub async fn create_movie(&self, movie_data: CreateMovie) -> ApiResult<MovieResponse> {
        let mut tx = self.db.begin().await?;

        let movie = sqlx::query_as::<_, Movie>(
            "INSERT INTO movies (tmdb_id, title, overview, poster_path, backdrop_path, \
             release_date, vote_average, vote_count, popularity) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING *",
        )
        .bind(movie_data.tmdb_id)
        .bind(&movie_data.title)
        .bind(&movie_data.overview)
        .bind(&movie_data.poster_path)
        .bind(&movie_data.backdrop_path)
        .bind(movie_data.release_date)
        .bind(movie_data.vote_average)
        .bind(movie_data.vote_count)
        .bind(movie_data.popularity)
        .fetch_one(&mut *tx)
        .await?;

        for genre_id in &movie_data.genre_ids {
            sqlx::query(
                "INSERT INTO movie_genres (movie_id, genre_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(movie.id)
            .bind(genre_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let genres = self.genres_for_movie(movie.id).await?;
        Ok(MovieResponse::with_genres(movie, genres))
    }

    /// Movie detail with its genres; unknown ids are a not-found error.
    pub async fn get_movie(&self, movie_id: i32) -> ApiResult<MovieResponse> {
        let movie = sqlx::query_as::<_, Movie>("SELECT * FROM movies WHERE id = $1")
            .bind(movie_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Movie {movie_id} not found")))?;

        let genres = self.genres_for_movie(movie.id).await?;
        Ok(MovieResponse::with_genres(movie, genres))
    }

    pub async fn list_popular(&self, page: i64) -> ApiResult<MovieListResponse> {
        let page = page.max(1);

        let movies = sqlx::query_as::<_, Movie>(
            "SELECT * FROM movies \
             ORDER BY popularity DESC NULLS LAST, vote_average DESC NULLS LAST \
             LIMIT $1 OFFSET $2",
        )
        .bind(PAGE_SIZE)
        .bind((page - 1) * PAGE_SIZE)
        .fetch_all(&self.db)
        .await?;

        let total_results = self.count_movies().await?;
        let movies = self.attach_genres(movies).await?;

        Ok(MovieListResponse {
            movies,
            total_results,
        })
    }

    pub async fn search(&self, query: &str, page: i64) -> ApiResult<PagedMoviesResponse> {
        let page = page.max(1);
        let pattern = format!("%{}%", query.trim());

        let movies = sqlx::query_as::<_, Movie>(
            "SELECT * FROM movies WHERE title ILIKE $1 \
             ORDER BY popularity DESC NULLS LAST \
             LIMIT $2 OFFSET $3",
        )
        .bind(&pattern)
        .bind(PAGE_SIZE)
        .bind((page - 1) * PAGE_SIZE)
        .fetch_all(&self.db)
        .await?;

        let total_results: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM movies WHERE title ILIKE $1")
                .bind(&pattern)
                .fetch_one(&self.db)
                .await?;

        let results = self.attach_genres(movies).await?;
        Ok(PagedMoviesResponse::new(page, results, total_results))
    }

    pub async fn by_genre(&self, genre_id: i32, page: i64) -> ApiResult<PagedMoviesResponse> {
        let page = page.max(1);

        let movies = sqlx::query_as::<_, Movie>(
            "SELECT m.* FROM movies m \
             JOIN movie_genres mg ON mg.movie_id = m.id \
             WHERE mg.genre_id = $1 \
             ORDER BY m.popularity DESC NULLS LAST \
             LIMIT $2 OFFSET $3",
        )
        .bind(genre_id)
        .bind(PAGE_SIZE)
        .bind((page - 1) * PAGE_SIZE)
        .fetch_all(&self.db)
        .await?;

        let total_results: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM movie_genres WHERE genre_id = $1",
        )
        .bind(genre_id)
        .fetch_one(&self.db)
        .await?;

        let results = self.attach_genres(movies).await?;
        Ok(PagedMoviesResponse::new(page, results, total_results))
    }

    /// Movies sharing at least one genre with the given one.
    pub async fn similar(
        &self,
        movie_id: i32,
        page: i64,
        limit: i64,
    ) -> ApiResult<SimilarMoviesResponse> {
        // 404 before computing anything for an unknown source movie.
        self.get_movie(movie_id).await?;

        let page = page.max(1);

        let movies = sqlx::query_as::<_, Movie>(
            "SELECT DISTINCT m.* FROM movies m \
             JOIN movie_genres mg ON mg.movie_id = m.id \
             WHERE mg.genre_id IN \
                 (SELECT genre_id FROM movie_genres WHERE movie_id = $1) \
               AND m.id <> $1 \
             ORDER BY m.popularity DESC NULLS LAST, m.vote_average DESC NULLS LAST \
             LIMIT $2 OFFSET $3",
        )
        .bind(movie_id)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&self.db)
        .await?;

        let total_results: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT mg.movie_id) FROM movie_genres mg \
             WHERE mg.genre_id IN \
                 (SELECT genre_id FROM movie_genres WHERE movie_id = $1) \
               AND mg.movie_id <> $1",
        )
        .bind(movie_id)
        .fetch_one(&self.db)
        .await?;

        let results = self.attach_genres(movies).await?;
        Ok(SimilarMoviesResponse {
            results,
            total_results,
        })
    }

    pub async fn list_genres(&self) -> ApiResult<Vec<GenreResponse>> {
        let genres = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY name")
            .fetch_all(&self.db)
            .await?;

        Ok(genres.into_iter().map(GenreResponse::from).collect())
    }

    async fn count_movies(&self) -> ApiResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    async fn genres_for_movie(&self, movie_id: i32) -> ApiResult<Vec<GenreResponse>> {
        let genres = sqlx::query_as::<_, GenreResponse>(
            "SELECT g.id, g.name FROM genres g \
             JOIN movie_genres mg ON mg.genre_id = g.id \
             WHERE mg.movie_id = $1 ORDER BY g.name",
        )
        .bind(movie_id)
        .fetch_all(&self.db)
        .await?;

        Ok(genres)
    }

    async fn attach_genres(&self, movies: Vec<Movie>) -> ApiResult<Vec<MovieResponse>> {
        let mut by_movie = genres_for_movies(&self.db, movies.iter().map(|m| m.id).collect()).await?;

        Ok(movies
            .into_iter()
            .map(|movie| {
                let genres = by_movie.remove(&movie.id).unwrap_or_default();
                MovieResponse::with_genres(movie, genres)
            })
            .collect())
    }
}

/// Genre rows for a batch of movies in one query, keyed by movie id.
pub(crate) async fn genres_for_movies(
    db: &PgPool,
    movie_ids: Vec<i32>,
) -> ApiResult<HashMap<i32, Vec<GenreResponse>>> {
    if movie_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, (i32, i32, String)>(
        "SELECT mg.movie_id, g.id, g.name FROM movie_genres mg \
         JOIN genres g ON g.id = mg.genre_id \
         WHERE mg.movie_id = ANY($1) ORDER BY g.name",
    )
    .bind(&movie_ids)
    .fetch_all(db)
    .await?;

    let mut by_movie: HashMap<i32, Vec<GenreResponse>> = HashMap::new();
    for (movie_id, id, name) in rows {
        by_movie
            .entry(movie_id)
            .or_default()
            .push(GenreResponse { id, name });
    }

    Ok(by_movie)
}
