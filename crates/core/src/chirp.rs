//! Chirp body limits and validation.

use crate::error::CoreError;

/// Maximum length of a chirp body, counted in Unicode scalar values.
pub const MAX_CHIRP_LENGTH: usize = 140;

/// Validate a chirp body before it is persisted.
///
/// The body must contain at least one non-whitespace character and be at most
/// [`MAX_CHIRP_LENGTH`] characters long. Multi-byte characters count once.
pub fn validate_chirp_body(body: &str) -> Result<(), CoreError> {
    if body.trim().is_empty() {
        return Err(CoreError::Validation("Chirp body must not be empty".to_string()));
    }
    let length = body.chars().count();
    if length > MAX_CHIRP_LENGTH {
        return Err(CoreError::Validation(format!(
            "Chirp exceeds {MAX_CHIRP_LENGTH} characters (got {length})"
        )));
    }
    Ok(())
}
