// Library crate for the clubhouse membership server
// This file exposes the public API for integration tests

pub mod account;
pub mod auth;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use account::{Account, AccountRepository, InMemoryAccountRepository};
pub use auth::SessionClaims;
pub use shared::{AppError, AppState};

use axum::{
    http::{StatusCode, Uri},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

/// Builds the application router
///
/// The protected route sits behind the bearer token guard; everything else
/// is open. Unknown paths fall through to a descriptive 404.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Hello, World!" }))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", get(auth::logout))
        .route(
            "/api/protected",
            get(auth::protected).route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_auth,
            )),
        )
        .fallback(unknown_route)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Uniform 404 for paths outside the application
async fn unknown_route(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": 404,
            "message": format!("Cannot find the URL {uri} in this application. Please check."),
        })),
    )
}
