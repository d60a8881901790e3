//! Validation of email/password pairs submitted for registration and login.
//!
//! The password hasher accepts any input, including the empty string, so
//! empty secrets have to be turned away here before hashing.

use crate::error::CoreError;

/// Reject credentials with a blank email or an empty password.
///
/// Passwords are not trimmed: leading or trailing whitespace is part of the
/// secret.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), CoreError> {
    if email.trim().is_empty() {
        return Err(CoreError::Validation("email is required".to_string()));
    }
    if password.is_empty() {
        return Err(CoreError::Validation("password is required".to_string()));
    }
    Ok(())
}
