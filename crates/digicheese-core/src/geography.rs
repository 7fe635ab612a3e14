//! # French Geography Rules
//!
//! Postal codes and département codes as used by the commune and
//! département endpoints.
//!
//! ## Postal Code ↔ Département
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  General case: first two postal digits = département code              │
//! │      69001 ──► "69"     01000 ──► "01" (code "1" is zero-padded)       │
//! │                                                                         │
//! │  Corsica: split département, shared "20" prefix                        │
//! │      2A ◄── 200xx, 201xx        2B ◄── 202xx, 203xx                    │
//! │                                                                         │
//! │  Overseas: three-digit codes                                           │
//! │      971 ◄── 971xx   972 ◄── 972xx   ...   976 ◄── 976xx               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};

/// Number of digits in a French postal code.
pub const POSTAL_CODE_LEN: usize = 5;

/// Départements whose postal prefix is not simply their code.
const SPECIAL_DEPARTMENTS: &[(&str, &[&str])] = &[
    ("2A", &["200", "201"]),
    ("2B", &["202", "203"]),
    ("971", &["971"]),
    ("972", &["972"]),
    ("973", &["973"]),
    ("974", &["974"]),
    ("975", &["975"]),
    ("976", &["976"]),
];

/// Validates a postal code and returns it trimmed.
///
/// ## Rules
/// - Exactly 5 ASCII digits after trimming
///
/// ## Example
/// ```rust
/// use digicheese_core::geography::validate_postal_code;
///
/// assert_eq!(validate_postal_code(" 75001 ").unwrap(), "75001");
/// assert!(validate_postal_code("7500").is_err());
/// assert!(validate_postal_code("7500A").is_err());
/// ```
pub fn validate_postal_code(postal_code: &str) -> ValidationResult<String> {
    let postal_code = postal_code.trim();

    if postal_code.len() != POSTAL_CODE_LEN || !postal_code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::invalid_format(
            "postal_code",
            "must contain exactly 5 digits",
        ));
    }

    Ok(postal_code.to_string())
}

/// Trims and uppercases a département code, then checks its shape.
///
/// ## Accepted Shapes
/// - two digits (`01` .. `95`)
/// - `2A` / `2B` (Corsica)
/// - three digits (`971` .. `976`, overseas)
///
/// ## Example
/// ```rust
/// use digicheese_core::geography::normalize_department_code;
///
/// assert_eq!(normalize_department_code(" 2a ").unwrap(), "2A");
/// assert_eq!(normalize_department_code("974").unwrap(), "974");
/// assert!(normalize_department_code("7").is_err());
/// ```
pub fn normalize_department_code(code: &str) -> ValidationResult<String> {
    let code = code.trim().to_uppercase();

    if code.chars().count() < 2 {
        return Err(ValidationError::TooShort {
            field: "department_code".to_string(),
            min: 2,
        });
    }

    let all_digits = code.chars().all(|c| c.is_ascii_digit());
    let valid = match code.len() {
        2 => all_digits || code == "2A" || code == "2B",
        3 => all_digits,
        _ => false,
    };

    if !valid {
        return Err(ValidationError::invalid_format(
            "department_code",
            "must be two digits, 2A, 2B or a three-digit overseas code",
        ));
    }

    Ok(code)
}

/// Checks that a postal code belongs to a département.
///
/// Blank input never matches. Codes are compared as given (after
/// uppercasing the département), so callers validate shapes first when
/// they care about the difference between "no match" and "malformed".
///
/// ## Example
/// ```rust
/// use digicheese_core::geography::postal_code_matches_department;
///
/// assert!(postal_code_matches_department("69001", "69"));
/// assert!(postal_code_matches_department("20000", "2A"));
/// assert!(postal_code_matches_department("01000", "1"));
/// assert!(!postal_code_matches_department("75001", "69"));
/// ```
pub fn postal_code_matches_department(postal_code: &str, department_code: &str) -> bool {
    let postal_code = postal_code.trim();
    let department_code = department_code.trim().to_uppercase();

    if postal_code.is_empty() || department_code.is_empty() {
        return false;
    }

    if let Some((_, prefixes)) = SPECIAL_DEPARTMENTS
        .iter()
        .find(|(code, _)| *code == department_code)
    {
        return postal_code
            .get(..3)
            .is_some_and(|prefix| prefixes.contains(&prefix));
    }

    let padded = format!("{:0>2}", department_code);
    postal_code.get(..2) == Some(padded.as_str())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_postal_code() {
        assert_eq!(validate_postal_code("39000").unwrap(), "39000");
        assert!(validate_postal_code("").is_err());
        assert!(validate_postal_code("390000").is_err());
        assert!(validate_postal_code("39 00").is_err());
    }

    #[test]
    fn test_normalize_department_code() {
        assert_eq!(normalize_department_code("39").unwrap(), "39");
        assert_eq!(normalize_department_code("2b").unwrap(), "2B");
        assert!(normalize_department_code("").is_err());
        assert!(normalize_department_code("2C").is_err());
        assert!(normalize_department_code("1234").is_err());
        assert!(normalize_department_code("AB").is_err());
    }

    #[test]
    fn test_general_case() {
        assert!(postal_code_matches_department("39000", "39"));
        assert!(postal_code_matches_department("25300", "25"));
        assert!(!postal_code_matches_department("39000", "25"));
    }

    #[test]
    fn test_single_digit_department_is_zero_padded() {
        assert!(postal_code_matches_department("05000", "5"));
        assert!(postal_code_matches_department("05000", "05"));
    }

    #[test]
    fn test_corsica() {
        assert!(postal_code_matches_department("20000", "2A"));
        assert!(postal_code_matches_department("20100", "2a"));
        assert!(postal_code_matches_department("20200", "2B"));
        assert!(!postal_code_matches_department("20600", "2B"));
        assert!(!postal_code_matches_department("20200", "2A"));
    }

    #[test]
    fn test_overseas() {
        assert!(postal_code_matches_department("97400", "974"));
        assert!(postal_code_matches_department("97600", "976"));
        assert!(!postal_code_matches_department("97400", "971"));
        // A bare "97" is not a special case and falls back to the prefix rule
        assert!(postal_code_matches_department("97400", "97"));
    }

    #[test]
    fn test_blank_input_never_matches() {
        assert!(!postal_code_matches_department("", "39"));
        assert!(!postal_code_matches_department("39000", ""));
        assert!(!postal_code_matches_department("   ", "  "));
    }
}
