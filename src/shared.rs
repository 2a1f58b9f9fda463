use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::account::repository::AccountRepository;
use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenService;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountRepository + Send + Sync>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenService>,
}

impl AppState {
    pub fn new(
        accounts: Arc<dyn AccountRepository + Send + Sync>,
        password_hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            accounts,
            password_hasher,
            tokens,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("name validation failed: {0}")]
    NameValidation(String),

    #[error("age validation failed: {0}")]
    AgeValidation(String),

    #[error("duplicate username: {0}")]
    DuplicateUsername(String),

    #[error("invalid user: {0}")]
    InvalidUser(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("no token provided")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("database error: {0}")]
    Database(String),

    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NameValidation(msg) | AppError::AgeValidation(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::DuplicateUsername(_) => (
                StatusCode::CONFLICT,
                "Username is already taken.".to_string(),
            ),
            AppError::InvalidUser(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::AuthenticationFailed(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "Access Denied: No token provided.".to_string(),
            ),
            // Distinct kinds internally; one user-facing message so callers
            // can't tell which check failed.
            AppError::InvalidToken(_) | AppError::ExpiredToken => (
                StatusCode::FORBIDDEN,
                "Invalid or expired token.".to_string(),
            ),
            AppError::Database(_) | AppError::Internal => {
                error!(error = %self, "unhandled internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "message": message
        }));

        (status, body).into_response()
    }
}
