use axum::{
    extract::{Path, Query, State},
    middleware,
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;

use super::routes::AppState;
use crate::auth::{jwt_auth_middleware, AuthUser};
use crate::error::ApiResult;
use crate::models::MovieResponse;

pub fn recommendation_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/personalized",
            get(personalized).route_layer(middleware::from_fn_with_state(
                state.auth_service.clone(),
                jwt_auth_middleware,
            )),
        )
        .route("/by-genre/:genre_id", get(by_genre))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct LimitQuery {
    limit: Option<i64>,
}

#[tracing::instrument(skip(state, user))]
async fn personalized(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<LimitQuery>,
) -> ApiResult<Json<Vec<MovieResponse>>> {
    let response = state
        .recommendation_service
        .personalized(user.user_id, params.limit.unwrap_or(12))
        .await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state))]
async fn by_genre(
    State(state): State<AppState>,
    Path(genre_id): Path<i32>,
    Query(params): Query<LimitQuery>,
) -> ApiResult<Json<Vec<MovieResponse>>> {
    let response = state
        .recommendation_service
        .by_genre(genre_id, params.limit.unwrap_or(8))
        .await?;
    Ok(Json(response))
}
