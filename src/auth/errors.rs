use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Incorrect username or password")]
    InvalidCredentials,
    #[error("User not found")]
    UserNotFound,
    #[error("Username already registered")]
    UsernameAlreadyExists,
    #[error("Email already registered")]
    EmailAlreadyExists,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Missing authorization header")]
    MissingAuthHeader,
    #[error("Invalid authorization header format")]
    InvalidAuthHeaderFormat,
    #[error("Validation failed")]
    Validation(#[from] validator::ValidationErrors),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Password hashing error: {0}")]
    PasswordHashing(#[from] crate::auth::password::PasswordError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Credential mismatches share one message; the response never
        // reveals which field was wrong.
        let (status, error_message) = match &self {
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Incorrect username or password"),
            AuthError::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
            AuthError::UsernameAlreadyExists => (StatusCode::CONFLICT, "Username already registered"),
            AuthError::EmailAlreadyExists => (StatusCode::CONFLICT, "Email already registered"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
            AuthError::MissingAuthHeader => (StatusCode::UNAUTHORIZED, "Missing authorization header"),
            AuthError::InvalidAuthHeaderFormat => {
                (StatusCode::UNAUTHORIZED, "Invalid authorization header format")
            }
            AuthError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation failed"),
            AuthError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error"),
            AuthError::Jwt(_) => (StatusCode::UNAUTHORIZED, "Token error"),
            AuthError::PasswordHashing(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Password processing error")
            }
        };

        let body = match &self {
            AuthError::Validation(errors) => Json(json!({
                "error": error_message,
                "details": errors,
            })),
            // Storage and hashing failures are logged, never echoed.
            AuthError::Database(err) => {
                tracing::error!("Auth database error: {err}");
                Json(json!({ "error": error_message }))
            }
            AuthError::PasswordHashing(err) => {
                tracing::error!("Password hashing error: {err}");
                Json(json!({ "error": error_message }))
            }
            _ => Json(json!({
                "error": error_message,
                "message": self.to_string(),
            })),
        };

        (status, body).into_response()
    }
}
