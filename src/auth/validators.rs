use super::models::CredentialsRequest;
use crate::common::{ValidationResult, Validator};

pub const MAX_USERNAME_CHARS: usize = 64;
pub const MAX_PASSWORD_BYTES: usize = 1024;

/// Adds username errors to `result` under `field`
pub fn check_username(result: &mut ValidationResult, field: &str, username: &str) {
    if username.is_empty() {
        result.add_error(field, "Username is required");
        return;
    }

    if username.chars().count() > MAX_USERNAME_CHARS {
        result.add_error(field, "Username must not exceed 64 characters");
    }

    if username
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        result.add_error(
            field,
            "Username must not contain whitespace or control characters",
        );
    }
}

/// Adds password errors to `result` under `field`
pub fn check_password(result: &mut ValidationResult, field: &str, password: &str) {
    if password.is_empty() {
        result.add_error(field, "Password is required");
    }

    if password.len() > MAX_PASSWORD_BYTES {
        result.add_error(field, "Password must not exceed 1024 bytes");
    }
}

impl Validator for CredentialsRequest {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        check_username(&mut result, "username", &self.username);
        check_password(&mut result, "password", &self.password);
        result
    }
}
