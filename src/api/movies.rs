use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;

use super::routes::AppState;
use crate::error::ApiError;
use crate::models::{
    GenreResponse, MovieListResponse, MovieResponse, PagedMoviesResponse, SimilarMoviesResponse,
};

/// Catalog browsing routes; all public.
pub fn movie_routes(state: AppState) -> Router {
    Router::new()
        .route("/popular", get(popular))
        .route("/genres", get(genres))
        .route("/search", get(search))
        .route("/genre/:genre_id", get(by_genre))
        .route("/:movie_id", get(detail))
        .route("/:movie_id/similar", get(similar))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    query: String,
    page: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SimilarQuery {
    page: Option<i64>,
    limit: Option<i64>,
}

#[tracing::instrument(skip(state))]
async fn popular(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Result<Json<MovieListResponse>, ApiError> {
    let response = state
        .movie_service
        .list_popular(params.page.unwrap_or(1))
        .await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state))]
async fn genres(State(state): State<AppState>) -> Result<Json<Vec<GenreResponse>>, ApiError> {
    let response = state.movie_service.list_genres().await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state))]
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<PagedMoviesResponse>, ApiError> {
    let response = state
        .movie_service
        .search(&params.query, params.page.unwrap_or(1))
        .await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state))]
async fn by_genre(
    State(state): State<AppState>,
    Path(genre_id): Path<i32>,
    Query(params): Query<PageQuery>,
) -> Result<Json<PagedMoviesResponse>, ApiError> {
    let response = state
        .movie_service
        .by_genre(genre_id, params.page.unwrap_or(1))
        .await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state))]
async fn detail(
    State(state): State<AppState>,
    Path(movie_id): Path<i32>,
) -> Result<Json<MovieResponse>, ApiError> {
    let response = state.movie_service.get_movie(movie_id).await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state))]
async fn similar(
    State(state): State<AppState>,
    Path(movie_id): Path<i32>,
    Query(params): Query<SimilarQuery>,
) -> Result<Json<SimilarMoviesResponse>, ApiError> {
    let response = state
        .movie_service
        .similar(movie_id, params.page.unwrap_or(1), params.limit.unwrap_or(8))
        .await?;
    Ok(Json(response))
}
