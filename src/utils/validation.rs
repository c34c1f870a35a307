// Request field validation helpers

use validator::ValidationError;

use crate::fingerprint::is_valid_fingerprint;

/// `validator` hook for fingerprint fields
pub fn validate_fingerprint(value: &str) -> Result<(), ValidationError> {
    if is_valid_fingerprint(value) {
        Ok(())
    } else {
        let mut error = ValidationError::new("fingerprint");
        error.message = Some("must be a 64 character hex SHA-256 digest".into());
        Err(error)
    }
}

/// Trim an optional string, treating blank as absent
pub fn trim_optional_field(field: Option<String>) -> Option<String> {
    field.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
