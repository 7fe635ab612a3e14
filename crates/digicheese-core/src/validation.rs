//! # Validation Module
//!
//! Field-level checks shared by every [`Normalize`](crate::normalize::Normalize)
//! implementation.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: axum extractors (apps/api)                                   │
//! │  ├── JSON shape, path/query types                                      │
//! │  └── limit / id ranges                                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Services call Normalize (this crate)                         │
//! │  ├── Trimming, casing                                                  │
//! │  └── THIS MODULE: lengths, ranges, formats                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE constraints                                                │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use digicheese_core::validation::{validate_text, validate_quantity};
//!
//! assert_eq!(validate_text("name", "  Comté  ", 100).unwrap(), "Comté");
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::{MAX_AMOUNT_CENTS, MAX_LINE_QUANTITY, MAX_PASSWORD_LEN, MIN_PASSWORD_LEN};

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required text field and returns it trimmed.
///
/// ## Rules
/// - Must not be blank after trimming
/// - At most `max` characters (counted as `char`s, not bytes)
pub fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates an optional text field.
///
/// Blank strings collapse to `None`; anything else is trimmed and
/// length-checked like [`validate_text`].
pub fn validate_optional_text(
    field: &str,
    value: Option<String>,
    max: usize,
) -> ValidationResult<Option<String>> {
    match value {
        Some(v) if !v.trim().is_empty() => validate_text(field, &v, max).map(Some),
        _ => Ok(None),
    }
}

/// Validates the value of a nullable patch field.
///
/// `None` (field absent) and `Some(None)` (explicit `null`) pass through;
/// a blank string becomes `Some(None)` and clears the column.
///
/// ## Example
/// ```rust
/// use digicheese_core::validation::validate_nullable_text;
///
/// assert_eq!(validate_nullable_text("notes", None, 10).unwrap(), None);
/// assert_eq!(validate_nullable_text("notes", Some(None), 10).unwrap(), Some(None));
/// assert_eq!(
///     validate_nullable_text("notes", Some(Some(" ".to_string())), 10).unwrap(),
///     Some(None)
/// );
/// ```
pub fn validate_nullable_text(
    field: &str,
    value: Option<Option<String>>,
    max: usize,
) -> ValidationResult<Option<Option<String>>> {
    value
        .map(|inner| validate_optional_text(field, inner, max))
        .transpose()
}

/// Runs `check` on the value of a nullable patch field, leaving an absent
/// field or an explicit `null` untouched.
pub fn validate_nullable<T>(
    value: Option<Option<T>>,
    check: impl FnOnce(T) -> ValidationResult<T>,
) -> ValidationResult<Option<Option<T>>> {
    match value {
        Some(Some(inner)) => check(inner).map(|v| Some(Some(v))),
        other => Ok(other),
    }
}

/// Validates an email address and returns it trimmed.
///
/// ## Rules
/// - Exactly one `@` with a non-empty local part and domain
/// - No whitespace
/// - At most `max` characters
///
/// ## Example
/// ```rust
/// use digicheese_core::validation::validate_email;
///
/// assert!(validate_email("email", "jean@fromagerie.fr", 255).is_ok());
/// assert!(validate_email("email", "jean.fromagerie.fr", 255).is_err());
/// ```
pub fn validate_email(field: &str, email: &str, max: usize) -> ValidationResult<String> {
    let email = validate_text(field, email, max)?;

    let mut parts = email.split('@');
    let well_formed = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
        }
        _ => false,
    };

    if !well_formed {
        return Err(ValidationError::invalid_format(
            field,
            "must be a valid email address",
        ));
    }

    Ok(email)
}

/// Validates a password before hashing.
///
/// ## Rules
/// - Between `MIN_PASSWORD_LEN` (6) and `MAX_PASSWORD_LEN` (255) characters
/// - Not trimmed: leading/trailing spaces are part of the secret
pub fn validate_password(password: &str) -> ValidationResult<()> {
    let len = password.chars().count();

    if len < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    if len > MAX_PASSWORD_LEN {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: MAX_PASSWORD_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates that a count, amount or weight is not negative.
///
/// ## Example
/// ```rust
/// use digicheese_core::validation::validate_non_negative;
///
/// assert!(validate_non_negative("unit_price_cents", 0).is_ok());
/// assert!(validate_non_negative("unit_price_cents", -100).is_err());
/// ```
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a money amount in cents.
///
/// ## Rules
/// - Not negative
/// - At most `MAX_AMOUNT_CENTS`
///
/// ## Example
/// ```rust
/// use digicheese_core::validation::validate_amount;
///
/// assert!(validate_amount("unit_price_cents", 2490).is_ok());
/// assert!(validate_amount("unit_price_cents", i64::MAX).is_err());
/// ```
pub fn validate_amount(field: &str, cents: i64) -> ValidationResult<()> {
    validate_non_negative(field, cents)?;

    if cents > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS,
        });
    }

    Ok(())
}

/// Validates an order line quantity.
///
/// ## Rules
/// - Must be positive (>= 1)
/// - At most `MAX_LINE_QUANTITY`
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a list page size.
///
/// ## Rules
/// - Between 1 and `max` inclusive
pub fn validate_limit(limit: u32, max: u32) -> ValidationResult<u32> {
    if limit == 0 || limit > max {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max: i64::from(max),
        });
    }

    Ok(limit)
}

/// Validates a record identifier taken from a URL path.
///
/// ## Rules
/// - Must be >= 1 (SQLite rowids start at 1)
pub fn validate_id(field: &str, id: i64) -> ValidationResult<i64> {
    if id < 1 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(id)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_text() {
        assert_eq!(validate_text("name", " Brie ", 10).unwrap(), "Brie");
        assert!(validate_text("name", "", 10).is_err());
        assert!(validate_text("name", "   ", 10).is_err());
        assert!(validate_text("name", &"A".repeat(11), 10).is_err());
    }

    #[test]
    fn test_validate_text_counts_chars_not_bytes() {
        // "Épinal" is 6 chars but 7 bytes
        assert!(validate_text("city_name", "Épinal", 6).is_ok());
    }

    #[test]
    fn test_validate_optional_text() {
        assert_eq!(validate_optional_text("notes", None, 10).unwrap(), None);
        assert_eq!(
            validate_optional_text("notes", Some("  ".to_string()), 10).unwrap(),
            None
        );
        assert_eq!(
            validate_optional_text("notes", Some(" affiné ".to_string()), 10).unwrap(),
            Some("affiné".to_string())
        );
        assert!(validate_optional_text("notes", Some("x".repeat(11)), 10).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(
            validate_email("email", " jean@fromagerie.fr ", 255).unwrap(),
            "jean@fromagerie.fr"
        );
        assert!(validate_email("email", "no-at-sign", 255).is_err());
        assert!(validate_email("email", "@fromagerie.fr", 255).is_err());
        assert!(validate_email("email", "jean@", 255).is_err());
        assert!(validate_email("email", "a@b@c", 255).is_err());
        assert!(validate_email("email", "jean dupont@fromagerie.fr", 255).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(256)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(250).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(MAX_LINE_QUANTITY).is_ok());
        assert_eq!(
            validate_quantity(5_000_000_000_000_000_000),
            Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1,
                max: MAX_LINE_QUANTITY,
            })
        );
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("cost_cents", 0).is_ok());
        assert!(validate_amount("cost_cents", MAX_AMOUNT_CENTS).is_ok());
        assert!(matches!(
            validate_amount("cost_cents", -1),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            validate_amount("cost_cents", MAX_AMOUNT_CENTS + 1),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_nullable() {
        let positive = |v: i64| validate_id("commune_id", v);

        assert_eq!(validate_nullable(None, positive).unwrap(), None);
        assert_eq!(validate_nullable(Some(None), positive).unwrap(), Some(None));
        assert_eq!(validate_nullable(Some(Some(4)), positive).unwrap(), Some(Some(4)));
        assert!(validate_nullable(Some(Some(0)), positive).is_err());
    }

    #[test]
    fn test_validate_limit() {
        assert_eq!(validate_limit(1, 100).unwrap(), 1);
        assert_eq!(validate_limit(100, 100).unwrap(), 100);
        assert!(validate_limit(0, 100).is_err());
        assert!(validate_limit(101, 100).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert_eq!(validate_id("id", 1).unwrap(), 1);
        assert!(validate_id("id", 0).is_err());
        assert!(validate_id("id", -7).is_err());
    }
}
