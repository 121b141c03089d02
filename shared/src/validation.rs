//! Input validation helpers
//!
//! Length limits mirror the column sizes of the PostgreSQL schema.
//! Lengths are counted in characters, as `VARCHAR(n)` does.

use rust_decimal::Decimal;

use crate::error::{AppError, ErrorCode};
use crate::rules::order::MAX_MONEY;

// ── Text length limits ──────────────────────────────────────────────

/// User login
pub const MAX_LOGIN_LEN: usize = 50;

/// Person names, menu item names, event titles
pub const MAX_NAME_LEN: usize = 100;

/// Role names, category names and slugs
pub const MAX_SHORT_NAME_LEN: usize = 50;

/// Table names ("T1", "Terrace 4")
pub const MAX_TABLE_NAME_LEN: usize = 10;

pub const MAX_PHONE_LEN: usize = 20;

pub const MAX_EMAIL_LEN: usize = 100;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 255;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 255;

/// Reservation comments
pub const MAX_NOTE_LEN: usize = 500;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Largest quantity of one menu item in a cart line or order line
pub const MAX_QUANTITY: i32 = 1000;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")).with_field(field));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_field(field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value {
        let len = v.chars().count();
        if len > max_len {
            return Err(AppError::validation(format!(
                "{field} is too long ({len} chars, max {max_len})"
            ))
            .with_field(field));
        }
    }
    Ok(())
}

/// Minimal email shape check: `local@domain.tld`
pub fn validate_email(value: &Option<String>) -> Result<(), AppError> {
    validate_optional_text(value, "email", MAX_EMAIL_LEN)?;
    if let Some(email) = value {
        let valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !email.contains(char::is_whitespace)
            }
            None => false,
        };
        if !valid {
            return Err(AppError::validation(format!("email '{email}' is not valid"))
                .with_field("email"));
        }
    }
    Ok(())
}

/// Password length before hashing
pub fn validate_password(value: &str) -> Result<(), AppError> {
    let len = value.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(AppError::with_message(
            ErrorCode::PasswordTooShort,
            format!("password must be at least {MIN_PASSWORD_LEN} chars"),
        )
        .with_field("password"));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long ({len} chars, max {MAX_PASSWORD_LEN})"
        ))
        .with_field("password"));
    }
    Ok(())
}

/// Category slug: non-empty, `[a-z0-9-]+`
pub fn validate_slug(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "slug", MAX_SHORT_NAME_LEN)?;
    let valid = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid {
        return Err(AppError::new(ErrorCode::CategorySlugInvalid)
            .with_field("slug")
            .with_detail("slug", value));
    }
    Ok(())
}

/// Menu price: `0 <= price <= 99 999 999.99`
pub fn validate_price(price: Decimal) -> Result<(), AppError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::with_message(
            ErrorCode::MenuItemInvalidPrice,
            format!("price must be non-negative, got {price}"),
        )
        .with_field("price"));
    }
    if price > MAX_MONEY {
        return Err(AppError::with_message(
            ErrorCode::MenuItemInvalidPrice,
            format!("price exceeds maximum allowed ({MAX_MONEY}), got {price}"),
        )
        .with_field("price"));
    }
    Ok(())
}

fn quantity_error(quantity: i64) -> AppError {
    AppError::with_message(
        ErrorCode::QuantityInvalid,
        format!("quantity must be between 1 and {MAX_QUANTITY}, got {quantity}"),
    )
    .with_field("quantity")
}

/// Line quantity must be in `1..=MAX_QUANTITY`
pub fn validate_quantity(quantity: i32) -> Result<(), AppError> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(quantity_error(i64::from(quantity)));
    }
    Ok(())
}

/// Quantity of a cart line after `added` more of the same item
pub fn merge_quantity(current: i32, added: i32) -> Result<i32, AppError> {
    let total = i64::from(current) + i64::from(added);
    if total > i64::from(MAX_QUANTITY) {
        return Err(quantity_error(total));
    }
    let total = total as i32;
    validate_quantity(total)?;
    Ok(total)
}

/// Body id must equal the path id
pub fn ensure_same_id(path_id: i32, body_id: i32) -> Result<(), AppError> {
    if path_id != body_id {
        return Err(AppError::id_mismatch(path_id, body_id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("T1", "name", MAX_TABLE_NAME_LEN).is_ok());

        let err = validate_required_text("   ", "name", MAX_TABLE_NAME_LEN).unwrap_err();
        assert_eq!(err.message, "name must not be empty");

        let err = validate_required_text("Terrace 123", "name", MAX_TABLE_NAME_LEN).unwrap_err();
        assert_eq!(err.message, "name is too long (11 chars, max 10)");
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        // 10 Cyrillic letters are 20 bytes
        assert!(validate_required_text("Веранда-01", "name", MAX_TABLE_NAME_LEN).is_ok());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "comment", MAX_NOTE_LEN).is_ok());
        let long = Some("x".repeat(MAX_URL_LEN + 1));
        assert!(validate_optional_text(&long, "image_url", MAX_URL_LEN).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email(&None).is_ok());
        assert!(validate_email(&Some("guest@chill.example".into())).is_ok());
        assert!(validate_email(&Some("guest".into())).is_err());
        assert!(validate_email(&Some("@chill.example".into())).is_err());
        assert!(validate_email(&Some("guest@localhost".into())).is_err());
        assert!(validate_email(&Some("gu est@chill.example".into())).is_err());
    }

    #[test]
    fn test_password() {
        assert_eq!(
            validate_password("12345").unwrap_err().code,
            ErrorCode::PasswordTooShort
        );
        assert!(validate_password("123456").is_ok());
        assert!(validate_password(&"p".repeat(MAX_PASSWORD_LEN + 1)).is_err());
    }

    #[test]
    fn test_slug() {
        assert!(validate_slug("hot-drinks-2").is_ok());
        assert_eq!(
            validate_slug("Hot Drinks").unwrap_err().code,
            ErrorCode::CategorySlugInvalid
        );
        assert_eq!(
            validate_slug("").unwrap_err().code,
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn test_price() {
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(Decimal::from_str("99999999.99").unwrap()).is_ok());
        assert_eq!(
            validate_price(Decimal::from_str("-0.01").unwrap())
                .unwrap_err()
                .code,
            ErrorCode::MenuItemInvalidPrice
        );
        assert!(validate_price(Decimal::from_str("100000000.00").unwrap()).is_err());
    }

    #[test]
    fn test_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_QUANTITY).is_ok());
        assert_eq!(
            validate_quantity(0).unwrap_err().code,
            ErrorCode::QuantityInvalid
        );
        assert_eq!(
            validate_quantity(2_000_000_000).unwrap_err().code,
            ErrorCode::QuantityInvalid
        );
    }

    #[test]
    fn test_merge_quantity() {
        assert_eq!(merge_quantity(2, 3).unwrap(), 5);
        assert_eq!(merge_quantity(MAX_QUANTITY - 1, 1).unwrap(), MAX_QUANTITY);

        let err = merge_quantity(MAX_QUANTITY, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::QuantityInvalid);
        assert_eq!(err.details.unwrap()["field"], "quantity");

        // Sum past i32::MAX stays an input error
        assert!(merge_quantity(i32::MAX, i32::MAX).is_err());
    }

    #[test]
    fn test_same_id() {
        assert!(ensure_same_id(5, 5).is_ok());
        assert_eq!(
            ensure_same_id(5, 6).unwrap_err().code,
            ErrorCode::IdMismatch
        );
    }
}
