use axum::Json;
use serde_json::{json, Value};

/// Fixed status payload, no authentication required.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Movie Recommendation System API" }))
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
