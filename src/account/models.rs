use sqlx::FromRow;

use super::validator::ValidatedRegistration;

/// Database model for registered accounts
///
/// Created once at registration and never mutated afterwards. The age
/// requirement is enforced by the validator before construction, not here.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Account {
    pub name: String,
    pub username: String, // unique within the store
    pub age: i64,
    pub password_hash: String, // PHC string; the plaintext never reaches the store
    pub email: String,
}

impl Account {
    /// Builds an account from validated registration input and a precomputed
    /// password hash
    pub fn new(input: ValidatedRegistration, password_hash: String) -> Self {
        Self {
            name: input.name,
            username: input.username,
            age: input.age,
            password_hash,
            email: input.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> ValidatedRegistration {
        ValidatedRegistration {
            name: "Ann".to_string(),
            username: "ann1".to_string(),
            age: 25,
            password: "pw123".to_string(),
            email: "a@x.com".to_string(),
        }
    }

    #[test]
    fn test_new_account_carries_hash_not_password() {
        let account = Account::new(sample_input(), "$argon2id$stub".to_string());

        assert_eq!(account.username, "ann1");
        assert_eq!(account.age, 25);
        assert_eq!(account.password_hash, "$argon2id$stub");
        assert_ne!(account.password_hash, "pw123");
    }
}
