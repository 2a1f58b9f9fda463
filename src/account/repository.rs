use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::Account;
use crate::shared::AppError;

/// Trait for account store operations
///
/// Username uniqueness is enforced here, atomically, not by callers.
#[async_trait]
pub trait AccountRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AppError>;
    async fn insert(&self, account: &Account) -> Result<Account, AppError>;
}

/// In-memory implementation of AccountRepository for development and testing
///
/// Accounts are keyed by username; the duplicate check and the insert happen
/// under one lock acquisition, so concurrent registrations for the same
/// username resolve to exactly one winner. Data is lost on restart.
pub struct InMemoryAccountRepository {
    accounts: Mutex<HashMap<String, Account>>,
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAccountRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated accounts
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        let mut account_map = HashMap::new();
        for account in accounts {
            account_map.insert(account.username.clone(), account);
        }

        Self {
            accounts: Mutex::new(account_map),
        }
    }

    /// Returns the current number of stored accounts
    pub fn account_count(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        debug!(username = %username, "Fetching account from memory");

        let accounts = self.accounts.lock().unwrap();
        let account = accounts.get(username).cloned();

        match &account {
            Some(_) => debug!(username = %username, "Account found in memory"),
            None => debug!(username = %username, "Account not found in memory"),
        }

        Ok(account)
    }

    #[instrument(skip(self, account))]
    async fn insert(&self, account: &Account) -> Result<Account, AppError> {
        debug!(username = %account.username, "Inserting account into memory");

        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&account.username) {
            warn!(username = %account.username, "Username already registered");
            return Err(AppError::DuplicateUsername(account.username.clone()));
        }
        accounts.insert(account.username.clone(), account.clone());

        debug!(username = %account.username, "Account inserted into memory");
        Ok(account.clone())
    }
}

/// PostgreSQL implementation of the account store
///
/// Relies on a unique index over `accounts.username`; a unique-violation on
/// insert is the store telling us the username is taken.
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        debug!(username = %username, "Fetching account from database");

        let account = sqlx::query_as::<_, Account>(
            "SELECT name, username, age, password_hash, email FROM accounts WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, username = %username, "Failed to fetch account from database");
            AppError::Database(e.to_string())
        })?;

        match &account {
            Some(_) => debug!(username = %username, "Account found in database"),
            None => debug!(username = %username, "Account not found in database"),
        }

        Ok(account)
    }

    #[instrument(skip(self, account))]
    async fn insert(&self, account: &Account) -> Result<Account, AppError> {
        debug!(username = %account.username, "Inserting account into database");

        let stored = sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (name, username, age, password_hash, email) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING name, username, age, password_hash, email",
        )
        .bind(&account.name)
        .bind(&account.username)
        .bind(account.age)
        .bind(&account.password_hash)
        .bind(&account.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    warn!(username = %account.username, "Username already registered");
                    return AppError::DuplicateUsername(account.username.clone());
                }
            }
            warn!(error = %e, "Failed to insert account into database");
            AppError::Database(e.to_string())
        })?;

        debug!(username = %stored.username, "Account inserted into database");
        Ok(stored)
    }
}
