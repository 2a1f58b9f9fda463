use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::{debug, error, instrument};

use super::types::SessionClaims;
use crate::shared::AppError;

/// Fixed session lifetime: one hour from issuance
pub const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Trait for issuing and verifying signed session tokens
///
/// Abstracted so the signing primitive is swappable without touching the
/// auth flow. Tokens are self-contained; there is no revocation list, and
/// expiry is the only termination path.
pub trait TokenService: Send + Sync {
    /// Issues a signed token asserting the given subject, expiring one hour
    /// from now
    fn issue(&self, subject: &str) -> Result<String, AppError>;

    /// Verifies signature and expiry, returning the embedded claims
    fn verify(&self, token: &str) -> Result<SessionClaims, AppError>;
}

/// JWT (HS256) implementation of the token service
///
/// The signing secret is process-wide state, injected at construction and
/// fixed from startup to shutdown.
#[derive(Clone)]
pub struct JwtTokenService {
    secret: String,
    lifetime_secs: i64,
}

impl JwtTokenService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            lifetime_secs: TOKEN_LIFETIME_SECS,
        }
    }

    /// Overrides the lifetime; lets tests mint already-expired tokens
    pub fn with_lifetime(secret: impl Into<String>, lifetime_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            lifetime_secs,
        }
    }

    /// Reads the signing secret from `JWT_SECRET` at bootstrap.
    ///
    /// There is deliberately no compiled-in fallback secret; an unset
    /// variable refuses to start rather than signing with a default.
    pub fn from_env() -> Result<Self, AppError> {
        match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => Ok(Self::new(secret)),
            _ => {
                error!("JWT_SECRET is not set; refusing to sign with a default secret");
                Err(AppError::Internal)
            }
        }
    }
}

impl TokenService for JwtTokenService {
    #[instrument(skip(self))]
    fn issue(&self, subject: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.lifetime_secs);

        let claims = SessionClaims {
            sub: subject.to_string(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        debug!(subject = %subject, exp = claims.exp, "Issuing session token");

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| {
            error!(error = %e, "Failed to sign session token");
            AppError::Internal
        })
    }

    #[instrument(skip(self, token))]
    fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        debug!("Decoding and verifying session token");

        // Default validation grants 60s of expiry grace; drop it so the
        // library rejects anything already past exp.
        let mut validation = Validation::default();
        validation.leeway = 0;

        let claims = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => {
                debug!("Session token expired");
                AppError::ExpiredToken
            }
            _ => {
                debug!(error = %e, "Session token rejected");
                AppError::InvalidToken(e.to_string())
            }
        })?;

        // Even at zero leeway the library only rejects exp < now, keeping a
        // token alive through its expiry second; a session is valid only
        // strictly before exp.
        if Utc::now().timestamp() as usize >= claims.exp {
            debug!("Session token expired");
            return Err(AppError::ExpiredToken);
        }

        debug!(subject = %claims.sub, exp = claims.exp, "Session token verified");
        Ok(claims)
    }
}
