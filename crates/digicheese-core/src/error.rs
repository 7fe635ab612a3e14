//! # Error Types
//!
//! Domain-specific error types for digicheese-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  digicheese-core (this file)                                           │
//! │  └── ValidationError  - Input rejected by a normalization rule         │
//! │                                                                         │
//! │  digicheese-db                                                         │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  apps/api                                                              │
//! │  ├── ServiceError     - What a service call can fail with              │
//! │  └── ApiError         - What the HTTP client sees (code + message)     │
//! │                                                                         │
//! │  Flow: ValidationError → ServiceError → ApiError → 400 Bad Request     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by [`crate::normalize::Normalize`] implementations and the
/// helpers in [`crate::validation`] and [`crate::geography`]. The API
/// layer answers all of them with `400 Bad Request`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Numeric value is below zero.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (postal code, department code, email, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A computed amount no longer fits in 64 bits.
    #[error("{field} exceeds the supported range")]
    Overflow { field: String },

    /// Upper bound of a range is below its lower bound.
    #[error("{max_field} must be greater than or equal to {min_field}")]
    InvertedRange { min_field: String, max_field: String },
}

impl ValidationError {
    /// Creates a `Required` error for a field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an `InvalidFormat` error for a field.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("lastname");
        assert_eq!(err.to_string(), "lastname is required");

        let err = ValidationError::TooLong {
            field: "city_name".to_string(),
            max: 50,
        };
        assert_eq!(err.to_string(), "city_name must be at most 50 characters");
    }

    #[test]
    fn test_invalid_format_message() {
        let err = ValidationError::invalid_format("postal_code", "must contain exactly 5 digits");
        assert_eq!(
            err.to_string(),
            "postal_code has invalid format: must contain exactly 5 digits"
        );
    }

    #[test]
    fn test_overflow_message() {
        let err = ValidationError::Overflow {
            field: "items_total_cents".to_string(),
        };
        assert_eq!(err.to_string(), "items_total_cents exceeds the supported range");
    }

    #[test]
    fn test_inverted_range_message() {
        let err = ValidationError::InvertedRange {
            min_field: "weight_min_grams".to_string(),
            max_field: "weight_max_grams".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "weight_max_grams must be greater than or equal to weight_min_grams"
        );
    }
}
