use super::models::{ChangePasswordRequest, RenameRequest};
use crate::auth::validators::{check_password, check_username};
use crate::common::{ValidationResult, Validator};

impl Validator for RenameRequest {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        check_username(&mut result, "username", &self.username);
        result
    }
}

impl Validator for ChangePasswordRequest {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if self.current_password.is_empty() {
            result.add_error("current_password", "Current password is required");
        }
        check_password(&mut result, "new_password", &self.new_password);

        result
    }
}
