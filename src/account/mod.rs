// Public API - what other modules can use
pub use models::Account;
pub use repository::{AccountRepository, InMemoryAccountRepository, PostgresAccountRepository};
pub use validator::{validate_registration, ValidatedRegistration, MINIMUM_AGE};

// Internal modules
pub mod models;
pub mod repository;
pub mod validator;
