//! # Normalization
//!
//! The hook services run on every create/patch payload before it reaches a
//! repository, plus the casing helpers those hooks are built from.
//!
//! ## Where Normalize Sits
//! ```text
//! POST /api/v1/clients  {"firstname": "jEAN", "lastname": "dupont"}
//!      │
//!      ▼
//! Service::create(data)
//!      │
//!      ├── data.normalize()?   ← THIS MODULE (pure, may reject)
//!      │        firstname → "Jean", lastname → "DUPONT"
//!      ▼
//! Repository::create(&data)   → INSERT ... RETURNING
//! ```

use crate::error::ValidationResult;

/// Field normalization applied by services before persistence.
///
/// Implementations trim, re-case and validate their own fields and return
/// the cleaned value, or the first rule that failed. Patch schemas only
/// touch the fields that are present.
pub trait Normalize: Sized {
    /// Returns the normalized value or the first validation failure.
    fn normalize(self) -> ValidationResult<Self>;
}

/// Uppercases the first character and lowercases the rest.
///
/// ## Example
/// ```rust
/// use digicheese_core::normalize::capitalize;
///
/// assert_eq!(capitalize("jEAN"), "Jean");
/// assert_eq!(capitalize("jean-pierre"), "Jean-pierre");
/// ```
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Uppercases every letter that follows a non-letter, lowercases the rest.
///
/// Used for commune names, where hyphens and apostrophes start new words.
///
/// ## Example
/// ```rust
/// use digicheese_core::normalize::title_case;
///
/// assert_eq!(title_case("SAINT-ÉTIENNE"), "Saint-Étienne");
/// assert_eq!(title_case("l'isle-sur-la-sorgue"), "L'Isle-Sur-La-Sorgue");
/// ```
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous_is_letter = false;

    for c in value.chars() {
        if previous_is_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_is_letter = c.is_alphabetic();
    }

    out
}

// =============================================================================
// Nullable Patch Fields
// =============================================================================

/// Deserializer for patch fields whose column may be cleared.
///
/// Paired with `#[serde(default)]`: an absent key stays `None`, an explicit
/// `null` becomes `Some(None)` and a value becomes `Some(Some(value))`.
///
/// ## Example
/// ```rust
/// use digicheese_core::normalize::double_option;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Patch {
///     #[serde(default, deserialize_with = "double_option::deserialize")]
///     notes: Option<Option<String>>,
/// }
///
/// let absent: Patch = serde_json::from_str("{}").unwrap();
/// let cleared: Patch = serde_json::from_str(r#"{"notes": null}"#).unwrap();
/// assert_eq!(absent.notes, None);
/// assert_eq!(cleared.notes, Some(None));
/// ```
pub mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
