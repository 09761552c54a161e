//! # Validation Module
//!
//! Input validation for create/update requests.
//!
//! ## Validation Strategy
//! Validation happens in layers. The HTTP handlers call these functions
//! before touching the database; the database enforces NOT NULL, UNIQUE,
//! and CHECK constraints as the last line of defense.

use chrono::NaiveDate;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of category and product names, matching the schema.
const MAX_NAME_LEN: usize = 255;

/// Validates a category name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 255 characters
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name)
}

/// Validates a product name. Same rules as category names.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name)
}

fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a product price. Prices are in the smallest currency unit and
/// may be zero (free items) but never negative.
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a stock level. Zero is fine; negative is not.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }
    Ok(())
}

/// Parses a report date parameter in `YYYY-MM-DD` form.
pub fn validate_report_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected YYYY-MM-DD".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_category_name("Minuman").is_ok());
        assert!(validate_product_name("Kopi Susu 250ml").is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(validate_category_name("").is_err());
        assert!(validate_category_name("   ").is_err());
    }

    #[test]
    fn test_overlong_name_rejected() {
        let name = "a".repeat(256);
        assert!(matches!(
            validate_product_name(&name),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_price_and_stock_bounds() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(15000).is_ok());
        assert!(validate_price(-1).is_err());

        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-5).is_err());
    }

    #[test]
    fn test_report_date_parsing() {
        assert!(validate_report_date("start_date", "2026-01-31").is_ok());
        assert!(validate_report_date("start_date", "31-01-2026").is_err());
        assert!(validate_report_date("end_date", "yesterday").is_err());
    }
}
