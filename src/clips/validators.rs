use crate::common::{ApiError, ValidationResult, Validator};

/// Largest clip accepted, in bytes
pub const MAX_CLIP_BYTES: usize = 1024 * 1024;

/// Raw request body destined to become clip text
pub struct ClipBody<'a>(pub &'a [u8]);

impl Validator for ClipBody<'_> {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if self.0.is_empty() {
            result.add_error("text", "Clip text is required");
        }

        if self.0.len() > MAX_CLIP_BYTES {
            result.add_error("text", "Clip text must not exceed 1 MiB");
        }

        if std::str::from_utf8(self.0).is_err() {
            result.add_error("text", "Clip text must be valid UTF-8");
        }

        result
    }
}

/// Validated clip text from a raw body
pub fn clip_text(body: &[u8]) -> Result<String, ApiError> {
    ClipBody(body).validate().into_result()?;
    Ok(String::from_utf8_lossy(body).into_owned())
}
