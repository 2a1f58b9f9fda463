use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::account::validator::string_field;

/// JWT claims carried by a session token
///
/// The signature covers all of these, so any edit to the subject or expiry
/// invalidates the token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub sub: String, // username the token asserts identity for
    pub exp: usize,  // expiration timestamp (standard JWT claim)
    pub iat: usize,  // issued at timestamp (standard JWT claim)
}

/// Request payload for login
///
/// Extracted from the raw body rather than deserialized: a body with absent
/// or non-string credentials resolves downstream as an unknown user instead
/// of a shape rejection.
#[derive(Debug)]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_body(body: &Value) -> Self {
        Self {
            user_name: string_field(body, "user_name"),
            password: string_field(body, "password"),
        }
    }
}

/// Response for successful registration and login
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
}

/// Response for the guarded route, echoing the verified claims
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ProtectedResponse {
    pub message: String,
    pub user: SessionClaims,
}
