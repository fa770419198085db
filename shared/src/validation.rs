//! Validation utilities shared by the API and the stores

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::types::MAX_KARDEX_LIMIT;

/// Validate a stock quantity sent to an add/remove/order operation
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a listing limit
pub fn validate_limit(limit: i64) -> Result<(), &'static str> {
    if limit < 1 {
        return Err("Limit must be at least 1");
    }
    if limit > MAX_KARDEX_LIMIT {
        return Err("Limit must be at most 1000");
    }
    Ok(())
}

/// Validate a username (1-50 chars, no surrounding whitespace)
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.trim().is_empty() {
        return Err("Username cannot be empty");
    }
    if username.chars().count() > 50 {
        return Err("Username must be at most 50 characters");
    }
    if username.trim() != username {
        return Err("Username cannot start or end with whitespace");
    }
    Ok(())
}

/// `validator` hook: sale prices cannot be negative
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        return Err(ValidationError::new("negative_price"));
    }
    Ok(())
}
