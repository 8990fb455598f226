//! Minimal request field checks used by the HTTP handlers.
//!
//! Each check returns a human-readable reason on failure.

use crate::models::account::is_supported_currency;
use crate::models::verify_email::SECRET_CODE_LENGTH;

fn validate_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), String> {
    let n = value.chars().count();
    if n < min || n > max {
        return Err(format!("{field} must contain from {min}-{max} characters"));
    }
    Ok(())
}

pub fn validate_username(value: &str) -> Result<(), String> {
    validate_length("username", value, 3, 100)?;
    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err("username must contain only lowercase letters, digits, or underscore".into());
    }
    Ok(())
}

pub fn validate_password(value: &str) -> Result<(), String> {
    validate_length("password", value, 6, 100)
}

pub fn validate_full_name(value: &str) -> Result<(), String> {
    validate_length("full_name", value, 3, 100)?;
    if !value.chars().all(|c| c.is_alphabetic() || c == ' ') {
        return Err("full_name must contain only letters or spaces".into());
    }
    Ok(())
}

/// Shape check only: one `@` with a non-empty local part and a dotted domain.
pub fn validate_email(value: &str) -> Result<(), String> {
    validate_length("email", value, 3, 200)?;
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split('.')
                    .filter(|label| !label.is_empty())
                    .count()
                    >= 2
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err("email is not a valid email address".into());
    }
    Ok(())
}

pub fn validate_currency(value: &str) -> Result<(), String> {
    if !is_supported_currency(value) {
        return Err(format!("currency {value} is not supported"));
    }
    Ok(())
}

pub fn validate_email_id(value: i64) -> Result<(), String> {
    if value <= 0 {
        return Err("email_id must be a positive integer".into());
    }
    Ok(())
}

pub fn validate_secret_code(value: &str) -> Result<(), String> {
    validate_length("secret_code", value, SECRET_CODE_LENGTH, SECRET_CODE_LENGTH)
}

pub fn validate_page(page_id: i64, page_size: i64) -> Result<(), String> {
    if page_id < 1 {
        return Err("page_id must be at least 1".into());
    }
    if !(5..=10).contains(&page_size) {
        return Err("page_size must be between 5 and 10".into());
    }
    Ok(())
}
