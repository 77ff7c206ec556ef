/// Input validation utilities
use crate::constants::MAX_EMAIL_ADDRESS_LENGTH;
use crate::error::RelayError;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_ADDRESS_LENGTH && EMAIL_REGEX.is_match(email)
}

pub fn validate_email_address(email: &str) -> Result<(), RelayError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(RelayError::Validation("Invalid email format".to_string()))
    }
}

/// Treats blank strings the same as absent fields
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
