//! Loyalty-program clients (`t_client`).

use serde::{Deserialize, Serialize};

use crate::error::ValidationResult;
use crate::normalize::{capitalize, double_option, Normalize};
use crate::validation::{
    validate_email, validate_id, validate_nullable, validate_nullable_text, validate_optional_text, validate_text,
};

const CIVILITY_MAX: usize = 8;
const LASTNAME_MAX: usize = 40;
const FIRSTNAME_MAX: usize = 30;
const ADDRESS_LINE_MAX: usize = 50;
const PHONE_MAX: usize = 10;
const EMAIL_MAX: usize = 255;

// =============================================================================
// Client
// =============================================================================

/// A loyalty-program customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Client {
    pub id: i64,

    /// Short form of address ("M.", "Mme").
    pub civility: Option<String>,

    /// Stored uppercased.
    pub lastname: String,

    /// Stored capitalized.
    pub firstname: String,

    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub address_line3: Option<String>,

    /// Commune of residence (`t_communes.id`).
    pub commune_id: Option<i64>,

    pub phone: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,

    /// Whether the client receives the newsletter.
    pub newsletter: bool,
}

/// Body of `POST /api/v1/clients`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCreate {
    #[serde(default)]
    pub civility: Option<String>,
    pub lastname: String,
    pub firstname: String,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub address_line3: Option<String>,
    #[serde(default)]
    pub commune_id: Option<i64>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub newsletter: bool,
}

impl ClientCreate {
    /// Creates a payload with only the required names set.
    pub fn new(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        ClientCreate {
            firstname: firstname.into(),
            lastname: lastname.into(),
            ..Default::default()
        }
    }
}

/// Body of `PATCH /api/v1/clients/{id}`.
///
/// Optional columns accept an explicit `null`, which clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientPatch {
    #[serde(deserialize_with = "double_option::deserialize", skip_serializing_if = "Option::is_none")]
    pub civility: Option<Option<String>>,
    pub lastname: Option<String>,
    pub firstname: Option<String>,
    #[serde(deserialize_with = "double_option::deserialize", skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<Option<String>>,
    #[serde(deserialize_with = "double_option::deserialize", skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<Option<String>>,
    #[serde(deserialize_with = "double_option::deserialize", skip_serializing_if = "Option::is_none")]
    pub address_line3: Option<Option<String>>,
    #[serde(deserialize_with = "double_option::deserialize", skip_serializing_if = "Option::is_none")]
    pub commune_id: Option<Option<i64>>,
    #[serde(deserialize_with = "double_option::deserialize", skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(deserialize_with = "double_option::deserialize", skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(deserialize_with = "double_option::deserialize", skip_serializing_if = "Option::is_none")]
    pub mobile: Option<Option<String>>,
    pub newsletter: Option<bool>,
}

// =============================================================================
// Normalization
// =============================================================================

fn normalize_lastname(value: &str) -> ValidationResult<String> {
    Ok(validate_text("lastname", value, LASTNAME_MAX)?.to_uppercase())
}

fn normalize_firstname(value: &str) -> ValidationResult<String> {
    Ok(capitalize(&validate_text("firstname", value, FIRSTNAME_MAX)?))
}

fn normalize_email(value: Option<String>) -> ValidationResult<Option<String>> {
    match value {
        Some(email) if !email.trim().is_empty() => {
            validate_email("email", &email, EMAIL_MAX).map(Some)
        }
        _ => Ok(None),
    }
}

fn normalize_commune_id(value: Option<i64>) -> ValidationResult<Option<i64>> {
    value.map(|id| validate_id("commune_id", id)).transpose()
}

impl Normalize for ClientCreate {
    fn normalize(self) -> ValidationResult<Self> {
        Ok(ClientCreate {
            civility: validate_optional_text("civility", self.civility, CIVILITY_MAX)?,
            lastname: normalize_lastname(&self.lastname)?,
            firstname: normalize_firstname(&self.firstname)?,
            address_line1: validate_optional_text("address_line1", self.address_line1, ADDRESS_LINE_MAX)?,
            address_line2: validate_optional_text("address_line2", self.address_line2, ADDRESS_LINE_MAX)?,
            address_line3: validate_optional_text("address_line3", self.address_line3, ADDRESS_LINE_MAX)?,
            commune_id: normalize_commune_id(self.commune_id)?,
            phone: validate_optional_text("phone", self.phone, PHONE_MAX)?,
            email: normalize_email(self.email)?,
            mobile: validate_optional_text("mobile", self.mobile, PHONE_MAX)?,
            newsletter: self.newsletter,
        })
    }
}

impl Normalize for ClientPatch {
    fn normalize(self) -> ValidationResult<Self> {
        Ok(ClientPatch {
            civility: validate_nullable_text("civility", self.civility, CIVILITY_MAX)?,
            lastname: self.lastname.as_deref().map(normalize_lastname).transpose()?,
            firstname: self.firstname.as_deref().map(normalize_firstname).transpose()?,
            address_line1: validate_nullable_text("address_line1", self.address_line1, ADDRESS_LINE_MAX)?,
            address_line2: validate_nullable_text("address_line2", self.address_line2, ADDRESS_LINE_MAX)?,
            address_line3: validate_nullable_text("address_line3", self.address_line3, ADDRESS_LINE_MAX)?,
            commune_id: validate_nullable(self.commune_id, |id| validate_id("commune_id", id))?,
            phone: validate_nullable_text("phone", self.phone, PHONE_MAX)?,
            email: self.email.map(normalize_email).transpose()?,
            mobile: validate_nullable_text("mobile", self.mobile, PHONE_MAX)?,
            newsletter: self.newsletter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_create_normalizes_names() {
        let client = ClientCreate::new("  jEAN-pierre ", "dupont").normalize().unwrap();
        assert_eq!(client.firstname, "Jean-pierre");
        assert_eq!(client.lastname, "DUPONT");
        assert!(!client.newsletter);
    }

    #[test]
    fn test_create_rejects_blank_lastname() {
        let err = ClientCreate::new("Marie", "   ").normalize().unwrap_err();
        assert_eq!(err, ValidationError::required("lastname"));
    }

    #[test]
    fn test_create_checks_lengths() {
        let long = "x".repeat(31);
        assert!(ClientCreate::new(long, "Martin").normalize().is_err());

        let mut client = ClientCreate::new("Marie", "Martin");
        client.phone = Some("06123456789".to_string());
        assert!(client.normalize().is_err());
    }

    #[test]
    fn test_create_blank_optionals_become_none() {
        let mut client = ClientCreate::new("Marie", "Martin");
        client.email = Some("  ".to_string());
        client.address_line1 = Some(" 12 rue du Lac ".to_string());
        let client = client.normalize().unwrap();
        assert_eq!(client.email, None);
        assert_eq!(client.address_line1.as_deref(), Some("12 rue du Lac"));
    }

    #[test]
    fn test_create_rejects_bad_email() {
        let mut client = ClientCreate::new("Marie", "Martin");
        client.email = Some("marie.martin".to_string());
        assert!(client.normalize().is_err());
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let patch = ClientPatch {
            lastname: Some("durand".to_string()),
            ..Default::default()
        }
        .normalize()
        .unwrap();

        assert_eq!(patch.lastname.as_deref(), Some("DURAND"));
        assert_eq!(patch.firstname, None);
        assert_eq!(patch.newsletter, None);
    }

    #[test]
    fn test_patch_deserializes_from_partial_json() {
        let patch: ClientPatch = serde_json::from_str(r#"{"newsletter": true}"#).unwrap();
        assert_eq!(patch.newsletter, Some(true));
        assert_eq!(patch.lastname, None);
        assert_eq!(patch.email, None);
    }

    #[test]
    fn test_patch_null_clears_optional_columns() {
        let patch: ClientPatch =
            serde_json::from_str(r#"{"email": null, "commune_id": null, "phone": " "}"#).unwrap();
        let patch = patch.normalize().unwrap();

        assert_eq!(patch.email, Some(None));
        assert_eq!(patch.commune_id, Some(None));
        assert_eq!(patch.phone, Some(None));
        assert_eq!(patch.mobile, None);
    }

    #[test]
    fn test_patch_still_validates_present_values() {
        let patch = ClientPatch {
            email: Some(Some("pas-un-email".to_string())),
            ..Default::default()
        };
        assert!(patch.normalize().is_err());

        let patch = ClientPatch {
            commune_id: Some(Some(-3)),
            ..Default::default()
        };
        assert!(patch.normalize().is_err());
    }
}
