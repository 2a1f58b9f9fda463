use axum::{
    extract::{Extension, State},
    response::Redirect,
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

use super::service::AuthService;
use super::types::{AuthResponse, LoginRequest, ProtectedResponse, SessionClaims};
use crate::shared::{AppError, AppState};

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(
        Arc::clone(&state.accounts),
        Arc::clone(&state.password_hasher),
        Arc::clone(&state.tokens),
    )
}

/// HTTP handler for registering a new account
///
/// POST /api/register
/// Takes the raw JSON body so validation failures (non-string name, junk age)
/// come back as 400s instead of body-deserialization rejections.
/// Returns a confirmation message and the account's first session token.
#[instrument(name = "register", skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<AuthResponse>, AppError> {
    info!("Registering new account");

    let (account, token) = auth_service(&state).register(&payload).await?;

    info!(
        username = %account.username,
        token_length = token.len(),
        "Account registered"
    );

    Ok(Json(AuthResponse {
        message: "Account added successfully".to_string(),
        token,
    }))
}

/// HTTP handler for logging in an existing account
///
/// POST /api/login
/// Takes the raw JSON body like register; absent or non-string credentials
/// fall through to the unknown-user path instead of a shape rejection.
/// Returns a fresh session token on success.
#[instrument(name = "login", skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<AuthResponse>, AppError> {
    let credentials = LoginRequest::from_body(&payload);
    info!(username = %credentials.user_name, "Login requested");

    let token = auth_service(&state)
        .login(&credentials.user_name, &credentials.password)
        .await?;

    Ok(Json(AuthResponse {
        message: "User Logged In".to_string(),
        token,
    }))
}

/// HTTP handler for logging out
///
/// GET /api/logout
/// Tokens expire on their own and no server-side session exists, so logout
/// is a client-side discard; the endpoint just sends the caller home.
#[instrument(name = "logout")]
pub async fn logout() -> Redirect {
    info!("Logout requested");
    Redirect::to("/")
}

/// HTTP handler behind the token guard
///
/// GET /api/protected
/// Echoes the claims the guard resolved from the bearer token
#[instrument(name = "protected", skip(claims))]
pub async fn protected(Extension(claims): Extension<SessionClaims>) -> Json<ProtectedResponse> {
    info!(subject = %claims.sub, "Protected route accessed");

    Json(ProtectedResponse {
        message: "Welcome to the protected route!".to_string(),
        user: claims,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Account, InMemoryAccountRepository};
    use crate::auth::middleware::require_auth;
    use crate::auth::token::{JwtTokenService, TokenService};
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        middleware,
        routing::{get, post},
        Router,
    };
    use serde_json::json;
    use tower::ServiceExt; // for `oneshot`

    fn test_app(state: AppState) -> Router {
        Router::new()
            .route("/api/register", post(register))
            .route("/api/login", post(login))
            .route("/api/logout", get(logout))
            .route(
                "/api/protected",
                get(protected).route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_auth,
                )),
            )
            .with_state(state)
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn ann() -> Value {
        json!({
            "name": "Ann",
            "user_name": "ann1",
            "age": 25,
            "password": "pw123",
            "email": "a@x.com",
        })
    }

    #[tokio::test]
    async fn test_register_handler_returns_token() {
        let app = test_app(AppStateBuilder::new().build());

        let response = app
            .oneshot(json_request("/api/register", ann()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Account added successfully");
        assert!(!body["token"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_handler_rejects_underage() {
        let app = test_app(AppStateBuilder::new().build());

        let payload = json!({
            "name": "Kid",
            "user_name": "kid1",
            "age": 20,
            "password": "pw123",
            "email": "k@x.com",
        });
        let response = app
            .oneshot(json_request("/api/register", payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Under required age limit");
    }

    #[tokio::test]
    async fn test_register_handler_duplicate_username_conflict() {
        let existing = Account {
            name: "Ann".to_string(),
            username: "ann1".to_string(),
            age: 25,
            password_hash: "$argon2id$stub".to_string(),
            email: "a@x.com".to_string(),
        };
        let accounts = Arc::new(InMemoryAccountRepository::with_accounts(vec![existing]));
        let app = test_app(AppStateBuilder::new().with_accounts(accounts).build());

        let response = app
            .oneshot(json_request("/api/register", ann()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Username is already taken.");
    }

    #[tokio::test]
    async fn test_login_handler_round_trip() {
        let app = test_app(AppStateBuilder::new().build());

        let response = app
            .clone()
            .oneshot(json_request("/api/register", ann()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(json_request(
                "/api/login",
                json!({ "user_name": "ann1", "password": "pw123" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "User Logged In");
        assert!(!body["token"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_handler_unknown_user_is_404() {
        let app = test_app(AppStateBuilder::new().build());

        let response = app
            .oneshot(json_request(
                "/api/login",
                json!({ "user_name": "nobody", "password": "x" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "No such user in database");
    }

    #[tokio::test]
    async fn test_login_handler_missing_fields_resolve_as_unknown_user() {
        let app = test_app(AppStateBuilder::new().build());

        // A body with no credentials gets the same error shape as a bad login
        let response = app
            .oneshot(json_request("/api/login", json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["status"], 404);
        assert_eq!(body["message"], "No such user in database");
    }

    #[tokio::test]
    async fn test_logout_handler_redirects_home() {
        let app = test_app(AppStateBuilder::new().build());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_protected_handler_echoes_claims() {
        let tokens = Arc::new(JwtTokenService::new("test-signing-secret"));
        let token = tokens.issue("ann1").unwrap();
        let app = test_app(AppStateBuilder::new().with_tokens(tokens).build());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/protected")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Welcome to the protected route!");
        assert_eq!(body["user"]["sub"], "ann1");
    }
}
