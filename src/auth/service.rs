use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::password::PasswordHasher;
use super::token::TokenService;
use crate::account::models::Account;
use crate::account::repository::AccountRepository;
use crate::account::validator::validate_registration;
use crate::shared::AppError;

/// Service orchestrating the credential lifecycle
///
/// Registration: Validator -> PasswordHasher -> AccountRepository ->
/// TokenService. Login: lookup -> verify -> TokenService. Every step returns
/// a typed failure and the sequence short-circuits at the first one.
pub struct AuthService {
    accounts: Arc<dyn AccountRepository + Send + Sync>,
    password_hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
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

    /// Registers a new account and issues its first session token
    ///
    /// Validation and hashing run before the store is touched, so a failure
    /// in either leaves no partial account behind.
    #[instrument(skip(self, input))]
    pub async fn register(&self, input: &Value) -> Result<(Account, String), AppError> {
        let validated = validate_registration(input)?;
        info!(username = %validated.username, "Registration input validated");

        let password_hash = self.password_hasher.hash(&validated.password).await?;
        let account = self
            .accounts
            .insert(&Account::new(validated, password_hash))
            .await?;
        let token = self.tokens.issue(&account.username)?;

        info!(username = %account.username, "Account registered");
        Ok((account, token))
    }

    /// Authenticates a returning account holder and issues a fresh token
    ///
    /// "No such user" and "wrong password" stay distinct failure kinds; how
    /// they are presented is the boundary's concern.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let account = match self.accounts.find_by_username(username).await? {
            Some(account) => account,
            None => {
                warn!(username = %username, "Login attempt for unknown username");
                return Err(AppError::InvalidUser(
                    "No such user in database".to_string(),
                ));
            }
        };

        if !self
            .password_hasher
            .verify(password, &account.password_hash)
            .await
        {
            warn!(username = %username, "Login attempt with wrong password");
            return Err(AppError::AuthenticationFailed(
                "Passwords don't match".to_string(),
            ));
        }

        let token = self.tokens.issue(&account.username)?;
        info!(username = %username, "User logged in");
        Ok(token)
    }
}
