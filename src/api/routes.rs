use std::sync::Arc;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::get,
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::health::{health_check, root};
use super::{auth, movies, recommendations, users};
use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::services::{
    HistoryService, MovieService, RatingService, RecommendationService, UserService,
    WatchlistService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub movie_service: MovieService,
    pub watchlist_service: WatchlistService,
    pub history_service: HistoryService,
    pub rating_service: RatingService,
    pub recommendation_service: RecommendationService,
}

impl AppState {
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        Self {
            auth_service: AuthService::new(db.clone(), &config.jwt_secret),
            user_service: UserService::new(db.clone()),
            movie_service: MovieService::new(db.clone()),
            watchlist_service: WatchlistService::new(db.clone()),
            history_service: HistoryService::new(db.clone()),
            rating_service: RatingService::new(db.clone()),
            recommendation_service: RecommendationService::new(db),
            config: Arc::new(config),
        }
    }
}

pub fn create_routes(db: PgPool, config: AppConfig) -> Router {
    let state = AppState::new(db, config);
    let upload_dir = state.config.upload_dir.clone();
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/auth", auth::auth_routes(state.clone()))
        .nest("/movies", movies::movie_routes(state.clone()))
        .nest("/users", users::user_routes(state.clone()))
        .nest(
            "/recommendations",
            recommendations::recommendation_routes(state),
        )
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// CORS from the configured origin list. A wildcard entry allows any origin
/// but cannot be combined with credentials.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, ACCEPT])
        .allow_credentials(true)
}
