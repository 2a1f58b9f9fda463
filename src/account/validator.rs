use serde_json::Value;
use tracing::debug;

use crate::shared::AppError;

/// Minimum age accepted at registration
pub const MINIMUM_AGE: i64 = 21;

/// Registration input after shape and constraint checks
///
/// `name` and `age` are validated; `username`, `password` and `email` pass
/// through unchecked (the store enforces username uniqueness).
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRegistration {
    pub name: String,
    pub username: String,
    pub age: i64,
    pub password: String,
    pub email: String,
}

/// Validates a raw registration body.
///
/// Works on the untyped JSON because the rules distinguish shape failures
/// (name not a string, age not an integer) from ordinary bad values, and
/// both must surface as validation failures rather than deserialization
/// rejections. Rules apply in order; the first failure wins.
pub fn validate_registration(input: &Value) -> Result<ValidatedRegistration, AppError> {
    let name = input.get("name").and_then(Value::as_str).unwrap_or_default();
    if name.trim().is_empty() {
        debug!("registration rejected: missing or empty name");
        return Err(AppError::NameValidation(
            "Name must be a non-empty string.".to_string(),
        ));
    }

    let age = parse_age(input.get("age")).ok_or_else(|| {
        debug!("registration rejected: age is not an integer");
        AppError::AgeValidation("Age must be a whole number.".to_string())
    })?;
    if age < MINIMUM_AGE {
        debug!(age, "registration rejected: under age limit");
        return Err(AppError::AgeValidation(
            "Under required age limit".to_string(),
        ));
    }

    Ok(ValidatedRegistration {
        name: name.to_string(),
        username: string_field(input, "user_name"),
        age,
        password: string_field(input, "password"),
        email: string_field(input, "email"),
    })
}

/// Accepts a JSON integer or a string holding one ("25" counts, "25abc" does not)
fn parse_age(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Pass-through extraction: absent or non-string fields become empty strings
pub(crate) fn string_field(input: &Value, key: &str) -> String {
    input
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
