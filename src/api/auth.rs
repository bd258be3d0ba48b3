use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Form, Router,
};

use super::routes::AppState;
use crate::auth::{jwt_auth_middleware, AuthError, AuthUser, LoginRequest, Token};
use crate::models::{CreateUser, UserResponse};

/// Authentication routes
pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route(
            "/me",
            get(me).route_layer(middleware::from_fn_with_state(
                state.auth_service.clone(),
                jwt_auth_middleware,
            )),
        )
        .with_state(state)
}

/// Register a new user
#[tracing::instrument(skip(state, request))]
async fn register(
    State(state): State<AppState>,
    Json(request): Json<CreateUser>,
) -> Result<(StatusCode, Json<Token>), AuthError> {
    let token = state.auth_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(token)))
}

/// Login with username/email + password (form body, as the OAuth2 password
/// flow submits it)
#[tracing::instrument(skip(state, request))]
async fn login(
    State(state): State<AppState>,
    Form(request): Form<LoginRequest>,
) -> Result<Json<Token>, AuthError> {
    let token = state.auth_service.login(request).await?;
    Ok(Json(token))
}

/// Current authenticated user
#[tracing::instrument(skip(state, user))]
async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>, AuthError> {
    let response = state.auth_service.current_user(user.user_id).await?;
    Ok(Json(response))
}
