use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{delete, get, post, put},
    Extension, Router,
};
use serde::Deserialize;

use super::routes::AppState;
use crate::auth::{jwt_auth_middleware, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    CreateGenrePreferences, CreateMovieHistory, CreateRating, CreateWatchlistEntry, Demographics,
    GenrePreferenceResponse, HistoryListResponse, MovieHistoryResponse, RatingResponse,
    UpdateDemographics, UpdateUser, UserResponse, WatchlistResponse, WatchlistToggleResponse,
};

/// Per-user routes. Everything except the avatar gallery requires a valid
/// bearer token.
pub fn user_routes(state: AppState) -> Router {
    let protected = Router::new()
        .route("/watch-list", get(get_watchlist))
        .route("/watch-list/toggle", post(toggle_watchlist))
        .route(
            "/watch-history",
            get(get_watch_history).post(add_watch_history),
        )
        .route("/watch-history/:movie_id", delete(remove_watch_history))
        .route("/ratings", get(list_ratings).post(rate_movie))
        .route("/profile", put(update_profile))
        .route(
            "/demographics",
            get(get_demographics).put(update_demographics),
        )
        .route("/avatar", post(upload_avatar))
        .route("/preferences", get(get_preferences).post(set_preferences))
        .route_layer(middleware::from_fn_with_state(
            state.auth_service.clone(),
            jwt_auth_middleware,
        ));

    Router::new()
        .route("/avatars", get(list_avatars))
        .merge(protected)
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct LimitQuery {
    limit: Option<i64>,
}

#[tracing::instrument(skip(state, user))]
async fn get_watchlist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<WatchlistResponse>> {
    let response = state.watchlist_service.list(user.user_id).await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state, user))]
async fn toggle_watchlist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateWatchlistEntry>,
) -> ApiResult<Json<WatchlistToggleResponse>> {
    let response = state
        .watchlist_service
        .toggle(user.user_id, request.movie_id)
        .await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state, user))]
async fn get_watch_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<LimitQuery>,
) -> ApiResult<Json<HistoryListResponse>> {
    let response = state
        .history_service
        .list(user.user_id, params.limit.unwrap_or(12))
        .await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state, user))]
async fn add_watch_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateMovieHistory>,
) -> ApiResult<(StatusCode, Json<MovieHistoryResponse>)> {
    let response = state
        .history_service
        .record(user.user_id, request.movie_id)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[tracing::instrument(skip(state, user))]
async fn remove_watch_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(movie_id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.history_service.remove(user.user_id, movie_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state, user, request))]
async fn rate_movie(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateRating>,
) -> ApiResult<Json<RatingResponse>> {
    let response = state.rating_service.rate(user.user_id, request).await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state, user))]
async fn list_ratings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<RatingResponse>>> {
    let response = state.rating_service.list(user.user_id).await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state, user, request))]
async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<UpdateUser>,
) -> ApiResult<Json<UserResponse>> {
    let response = state
        .user_service
        .update_profile(user.user_id, request)
        .await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state, user, request))]
async fn update_demographics(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<UpdateDemographics>,
) -> ApiResult<Json<UserResponse>> {
    let response = state
        .user_service
        .update_demographics(user.user_id, request)
        .await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state, user))]
async fn get_demographics(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Demographics>> {
    let response = state.user_service.get_demographics(user.user_id).await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state, user))]
async fn set_preferences(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateGenrePreferences>,
) -> ApiResult<Json<GenrePreferenceResponse>> {
    let response = state
        .user_service
        .set_genre_preferences(user.user_id, request.genre_ids)
        .await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state, user))]
async fn get_preferences(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<GenrePreferenceResponse>> {
    let response = state.user_service.get_genre_preferences(user.user_id).await?;
    Ok(Json(response))
}

/// Store an uploaded avatar under the upload directory and point the
/// profile at it.
#[tracing::instrument(skip(state, user, multipart))]
async fn upload_avatar(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> ApiResult<Json<UserResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::InvalidInput(err.to_string()))?
    {
        if field.name() != Some("avatar") {
            continue;
        }

        let extension = avatar_extension(field.content_type())?;
        let data = field
            .bytes()
            .await
            .map_err(|err| ApiError::InvalidInput(err.to_string()))?;

        if data.is_empty() {
            return Err(ApiError::InvalidInput("Empty avatar file".to_string()));
        }

        let avatar_dir = state.config.avatar_dir();
        tokio::fs::create_dir_all(&avatar_dir)
            .await
            .map_err(anyhow::Error::from)?;

        let filename = format!("{}.{}", user.user_id, extension);
        tokio::fs::write(avatar_dir.join(&filename), &data)
            .await
            .map_err(anyhow::Error::from)?;

        let avatar_url = format!("/uploads/avatars/{filename}");
        let response = state
            .user_service
            .set_avatar(user.user_id, &avatar_url)
            .await?;
        return Ok(Json(response));
    }

    Err(ApiError::InvalidInput("Missing avatar file".to_string()))
}

/// Avatar gallery; public, may be empty before any upload.
#[tracing::instrument(skip(state))]
async fn list_avatars(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let avatar_dir = state.config.avatar_dir();

    let mut entries = match tokio::fs::read_dir(&avatar_dir).await {
        Ok(entries) => entries,
        Err(_) => return Ok(Json(Vec::new())),
    };

    let mut avatars = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(anyhow::Error::from)? {
        if let Some(name) = entry.file_name().to_str() {
            avatars.push(format!("/uploads/avatars/{name}"));
        }
    }

    avatars.sort();
    Ok(Json(avatars))
}

fn avatar_extension(content_type: Option<&str>) -> Result<&'static str, ApiError> {
    let mime_type: mime::Mime = content_type
        .unwrap_or_default()
        .parse()
        .map_err(|_| ApiError::InvalidInput("Missing avatar content type".to_string()))?;

    if mime_type.type_() != mime::IMAGE {
        return Err(ApiError::InvalidInput(format!(
            "Unsupported avatar content type: {mime_type}"
        )));
    }

    match mime_type.subtype().as_str() {
        "png" => Ok("png"),
        "jpeg" => Ok("jpg"),
        "gif" => Ok("gif"),
        "webp" => Ok("webp"),
        other => Err(ApiError::InvalidInput(format!(
            "Unsupported avatar image format: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_extension_mapping() {
        assert_eq!(avatar_extension(Some("image/png")).unwrap(), "png");
        assert_eq!(avatar_extension(Some("image/jpeg")).unwrap(), "jpg");
        assert!(avatar_extension(Some("text/plain")).is_err());
        assert!(avatar_extension(Some("image/tiff")).is_err());
        assert!(avatar_extension(None).is_err());
    }
}
