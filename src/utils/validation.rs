//! Input validation primitives.

use crate::error::{Error, Result};

/// Require a string to be non-empty after trimming.
///
/// Returns a reference to the trimmed string on success.
pub fn require_non_empty<'a>(value: &'a str, field: &str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::validation_invalid_argument(field, message, None, None))
    } else {
        Ok(trimmed)
    }
}

/// Require a string to contain no whitespace at all.
pub fn require_no_whitespace<'a>(value: &'a str, field: &str, message: &str) -> Result<&'a str> {
    if value.chars().any(char::is_whitespace) {
        Err(Error::validation_invalid_argument(
            field,
            message,
            Some(value.to_string()),
            None,
        ))
    } else {
        Ok(value)
    }
}
