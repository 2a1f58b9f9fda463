use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, instrument, warn};

use crate::shared::{AppError, AppState};

/// Token guard for protected routes - rejects requests without a valid
/// `Authorization: Bearer <token>` header and adds SessionClaims to the request.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), auth::require_auth))
/// Handlers can then extract Extension(claims): Extension<SessionClaims>.
#[instrument(skip(state, req, next))]
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header on protected route");
            AppError::MissingToken
        })?;

    // A header that does not carry the Bearer scheme presents no token
    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Authorization header without Bearer scheme");
        AppError::MissingToken
    })?;

    let claims = match state.tokens.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Token verification failed: {}", e);
            return Err(e);
        }
    };

    debug!(subject = %claims.sub, "Bearer token accepted");
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
