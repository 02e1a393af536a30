//! Validation helpers shared by the backend services and the seed binary

use rust_decimal::Decimal;

// ============================================================================
// Checkout validations
// ============================================================================

/// A sale or purchase line quantity must be strictly positive.
pub fn is_valid_qty(qty: Decimal) -> bool {
    qty > Decimal::ZERO
}

/// A debt payment amount must be strictly positive.
pub fn is_valid_amount(amount: Decimal) -> bool {
    amount > Decimal::ZERO
}

/// Discounts may be zero but never negative.
pub fn is_valid_discount(discount: Decimal) -> bool {
    discount >= Decimal::ZERO
}

/// Product references coming from a cart must be positive integers.
pub fn is_valid_product_id(id: i64) -> bool {
    id > 0
}

// ============================================================================
// Account validations
// ============================================================================

/// Validate a login name (3-32 chars, ASCII alphanumeric plus underscore)
pub fn validate_login(login: &str) -> Result<(), &'static str> {
    if login.len() < 3 {
        return Err("Login must be at least 3 characters");
    }
    if login.len() > 32 {
        return Err("Login must be at most 32 characters");
    }
    if !login.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("Login must be alphanumeric or underscore only");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn qty_must_be_positive() {
        assert!(is_valid_qty(dec!(0.001)));
        assert!(!is_valid_qty(Decimal::ZERO));
        assert!(!is_valid_qty(dec!(-1)));
    }

    #[test]
    fn amount_must_be_positive() {
        assert!(is_valid_amount(dec!(100)));
        assert!(!is_valid_amount(Decimal::ZERO));
    }

    #[test]
    fn discount_may_be_zero() {
        assert!(is_valid_discount(Decimal::ZERO));
        assert!(is_valid_discount(dec!(500)));
        assert!(!is_valid_discount(dec!(-0.01)));
    }

    #[test]
    fn product_ids_are_positive() {
        assert!(is_valid_product_id(1));
        assert!(!is_valid_product_id(0));
        assert!(!is_valid_product_id(-7));
    }

    #[test]
    fn valid_logins() {
        assert!(validate_login("cashier_1").is_ok());
        assert!(validate_login("abc").is_ok());
    }

    #[test]
    fn invalid_logins() {
        assert!(validate_login("ab").is_err()); // too short
        assert!(validate_login(&"a".repeat(33)).is_err()); // too long
        assert!(validate_login("has space").is_err());
        assert!(validate_login("dash-ed").is_err());
    }

    #[test]
    fn password_needs_eight_chars() {
        assert!(validate_password("s3cret!!").is_ok());
        assert!(validate_password("short").is_err());
    }
}
