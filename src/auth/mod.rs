// Public API - what other modules can use
pub use handlers::{login, logout, protected, register};
pub use middleware::require_auth;
pub use types::SessionClaims;

// Internal modules
mod handlers;
mod middleware;
pub mod password;
pub mod service;
pub mod token;
mod types;
