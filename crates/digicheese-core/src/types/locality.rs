//! French administrative geography: départements (`t_departement`) and
//! communes (`t_communes`).
//!
//! ## Normalization
//! ```text
//! CommuneCreate { city_name: " saint-claude ", postal_code: " 39200 " }
//!      │
//!      ▼
//! CommuneCreate { city_name: "Saint-Claude",   postal_code: "39200" }
//!
//! DepartementCreate { department_code: " 2a ", department_name: "Corse-du-Sud" }
//!      │
//!      ▼
//! DepartementCreate { department_code: "2A",   department_name: "Corse-du-Sud" }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationResult;
use crate::geography::{normalize_department_code, validate_postal_code};
use crate::normalize::{double_option, title_case, Normalize};
use crate::validation::{validate_id, validate_nullable, validate_text};

const NAME_MAX: usize = 50;

// =============================================================================
// Departement
// =============================================================================

/// A French département.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Departement {
    pub id: i64,

    /// `39`, `2A`, `974`, ... Unique.
    pub department_code: String,

    pub department_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartementCreate {
    pub department_code: String,
    pub department_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepartementPatch {
    pub department_code: Option<String>,
    pub department_name: Option<String>,
}

impl Normalize for DepartementCreate {
    fn normalize(self) -> ValidationResult<Self> {
        Ok(DepartementCreate {
            department_code: normalize_department_code(&self.department_code)?,
            department_name: validate_text("department_name", &self.department_name, NAME_MAX)?,
        })
    }
}

impl Normalize for DepartementPatch {
    fn normalize(self) -> ValidationResult<Self> {
        Ok(DepartementPatch {
            department_code: self
                .department_code
                .as_deref()
                .map(normalize_department_code)
                .transpose()?,
            department_name: self
                .department_name
                .as_deref()
                .map(|name| validate_text("department_name", name, NAME_MAX))
                .transpose()?,
        })
    }
}

// =============================================================================
// Commune
// =============================================================================

/// A French commune, optionally attached to its département.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Commune {
    pub id: i64,

    /// Title-cased ("Lons-Le-Saunier").
    pub city_name: String,

    /// Five digits. Several communes may share one.
    pub postal_code: String,

    pub departement_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommuneCreate {
    pub city_name: String,
    pub postal_code: String,
    #[serde(default)]
    pub departement_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunePatch {
    pub city_name: Option<String>,
    pub postal_code: Option<String>,
    #[serde(deserialize_with = "double_option::deserialize", skip_serializing_if = "Option::is_none")]
    pub departement_id: Option<Option<i64>>,
}

fn normalize_city_name(value: &str) -> ValidationResult<String> {
    Ok(title_case(&validate_text("city_name", value, NAME_MAX)?))
}

fn normalize_departement_id(value: Option<i64>) -> ValidationResult<Option<i64>> {
    value.map(|id| validate_id("departement_id", id)).transpose()
}

impl Normalize for CommuneCreate {
    fn normalize(self) -> ValidationResult<Self> {
        Ok(CommuneCreate {
            city_name: normalize_city_name(&self.city_name)?,
            postal_code: validate_postal_code(&self.postal_code)?,
            departement_id: normalize_departement_id(self.departement_id)?,
        })
    }
}

impl Normalize for CommunePatch {
    fn normalize(self) -> ValidationResult<Self> {
        Ok(CommunePatch {
            city_name: self.city_name.as_deref().map(normalize_city_name).transpose()?,
            postal_code: self
                .postal_code
                .as_deref()
                .map(validate_postal_code)
                .transpose()?,
            departement_id: validate_nullable(self.departement_id, |id| validate_id("departement_id", id))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commune_create_normalizes() {
        let commune = CommuneCreate {
            city_name: "  lons-le-saunier ".to_string(),
            postal_code: " 39000 ".to_string(),
            departement_id: Some(39),
        }
        .normalize()
        .unwrap();

        assert_eq!(commune.city_name, "Lons-Le-Saunier");
        assert_eq!(commune.postal_code, "39000");
    }

    #[test]
    fn test_commune_create_rejects_bad_postal_code() {
        let result = CommuneCreate {
            city_name: "Dole".to_string(),
            postal_code: "391".to_string(),
            departement_id: None,
        }
        .normalize();
        assert!(result.is_err());
    }

    #[test]
    fn test_commune_patch_validates_present_postal_code() {
        let patch = CommunePatch {
            postal_code: Some("ABCDE".to_string()),
            ..Default::default()
        };
        assert!(patch.normalize().is_err());

        let patch = CommunePatch {
            city_name: Some("POLIGNY".to_string()),
            ..Default::default()
        }
        .normalize()
        .unwrap();
        assert_eq!(patch.city_name.as_deref(), Some("Poligny"));
        assert_eq!(patch.postal_code, None);
    }

    #[test]
    fn test_departement_create_uppercases_code() {
        let dep = DepartementCreate {
            department_code: " 2b ".to_string(),
            department_name: " Haute-Corse ".to_string(),
        }
        .normalize()
        .unwrap();
        assert_eq!(dep.department_code, "2B");
        assert_eq!(dep.department_name, "Haute-Corse");
    }

    #[test]
    fn test_departement_create_rejects_short_code() {
        let result = DepartementCreate {
            department_code: "7".to_string(),
            department_name: "Ardèche".to_string(),
        }
        .normalize();
        assert!(result.is_err());
    }
}
