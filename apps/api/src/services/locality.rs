//! # Commune and Département Services
//!
//! Geography lookups used to fill in client addresses.
//!
//! ```text
//! GET /communes/search/by-postal-code/39000   ──► validate_postal_code
//! GET /communes/search/by-department/2a       ──► normalize_department_code → "2A"
//! GET /communes/search/by-name?name=saint     ──► ≥ 2 chars, substring match
//! POST /communes/validate-postal-department   ──► pure check, no database
//! ```

use digicheese_core::geography::{
    normalize_department_code, postal_code_matches_department, validate_postal_code,
};
use digicheese_core::{Commune, Departement, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{found, Service, ServiceResult};

/// Shortest accepted commune-name search.
pub const NAME_SEARCH_MIN: usize = 2;

/// Result of checking a postal code against a département.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalDepartmentCheck {
    pub postal_code: String,
    pub department_code: String,
    pub is_valid: bool,
}

impl PostalDepartmentCheck {
    /// Echoes both codes back with the verdict.
    pub fn new(postal_code: &str, department_code: &str) -> Self {
        PostalDepartmentCheck {
            postal_code: postal_code.to_string(),
            department_code: department_code.to_string(),
            is_valid: postal_code_matches_department(postal_code, department_code),
        }
    }
}

impl Service<Commune> {
    /// Communes sharing a postal code. Several villages often do.
    pub async fn by_postal_code(&self, postal_code: &str) -> ServiceResult<Vec<Commune>> {
        let postal_code = validate_postal_code(postal_code)?;
        Ok(self.repository().get_by_postal_code(&postal_code).await?)
    }

    pub async fn by_department_code(&self, department_code: &str) -> ServiceResult<Vec<Commune>> {
        let code = normalize_department_code(department_code)?;
        Ok(self.repository().get_by_department_code(&code).await?)
    }

    /// Case-insensitive substring search on the city name.
    pub async fn search_by_name(&self, name: &str, limit: u32) -> ServiceResult<Vec<Commune>> {
        let name = name.trim();
        if name.chars().count() < NAME_SEARCH_MIN {
            return Err(ValidationError::TooShort {
                field: "name".to_string(),
                min: NAME_SEARCH_MIN,
            }
            .into());
        }

        debug!(name = %name, limit, "Searching communes");
        Ok(self.repository().search_by_name(name, limit).await?)
    }
}

impl Service<Departement> {
    pub async fn by_code(&self, code: &str) -> ServiceResult<Departement> {
        let code = normalize_department_code(code)?;
        found(self.repository().get_by_code(&code).await?, "Departement", code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::test_services;
    use crate::services::{ServiceError, Services};
    use digicheese_core::{CommuneCreate, DepartementCreate};

    async fn seed_jura(services: &Services) -> Departement {
        let jura = services
            .departements()
            .create(DepartementCreate {
                department_code: "39".to_string(),
                department_name: "Jura".to_string(),
            })
            .await
            .unwrap();

        for (city, postal_code) in [("lons-le-saunier", "39000"), ("dole", "39100")] {
            services
                .communes()
                .create(CommuneCreate {
                    city_name: city.to_string(),
                    postal_code: postal_code.to_string(),
                    departement_id: Some(jura.id),
                })
                .await
                .unwrap();
        }

        jura
    }

    #[test]
    fn test_postal_department_check() {
        assert!(PostalDepartmentCheck::new("39000", "39").is_valid);
        assert!(PostalDepartmentCheck::new("20100", "2A").is_valid);
        assert!(!PostalDepartmentCheck::new("25000", "39").is_valid);
        assert!(!PostalDepartmentCheck::new("", "39").is_valid);
    }

    #[tokio::test]
    async fn test_by_postal_code() {
        let services = test_services().await;
        seed_jura(&services).await;

        let communes = services.communes().by_postal_code(" 39000 ").await.unwrap();
        assert_eq!(communes.len(), 1);
        assert_eq!(communes[0].city_name, "Lons-Le-Saunier");

        assert!(matches!(
            services.communes().by_postal_code("3900").await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_by_department_code() {
        let services = test_services().await;
        seed_jura(&services).await;

        let communes = services.communes().by_department_code("39").await.unwrap();
        assert_eq!(communes.len(), 2);
        assert!(services.communes().by_department_code("25").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_by_name_requires_two_chars() {
        let services = test_services().await;
        seed_jura(&services).await;

        let found = services.communes().search_by_name("DOL", 10).await.unwrap();
        assert_eq!(found.len(), 1);

        assert!(matches!(
            services.communes().search_by_name(" d ", 10).await,
            Err(ServiceError::Validation(ValidationError::TooShort { .. }))
        ));
    }

    #[tokio::test]
    async fn test_departement_by_code() {
        let services = test_services().await;
        let jura = seed_jura(&services).await;

        assert_eq!(services.departements().by_code(" 39 ").await.unwrap(), jura);
        assert!(matches!(
            services.departements().by_code("25").await,
            Err(ServiceError::NotFound { entity: "Departement", .. })
        ));
    }
}
