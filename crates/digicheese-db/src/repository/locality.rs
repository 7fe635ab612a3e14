//! # Locality Repositories
//!
//! Table mappings for `t_departement` and `t_communes`, and the commune
//! searches used by address entry.
//!
//! ## Commune Lookups
//! ```text
//! get_by_postal_code("39000")      WHERE postal_code = ?
//! get_by_department_code("39")     JOIN t_departement d ON d.id = c.departement_id
//!                                  WHERE d.department_code = ?
//! search_by_name("saunier")        WHERE city_name LIKE '%saunier%'  (ASCII case-folded)
//! ```

use digicheese_core::{
    Commune, CommuneCreate, CommunePatch, Departement, DepartementCreate, DepartementPatch,
};
use tracing::debug;

use super::{Assignments, Changeset, Record, Repository};
use crate::error::DbResult;

// =============================================================================
// Departement
// =============================================================================

impl Record for Departement {
    const ENTITY: &'static str = "Departement";
    const TABLE: &'static str = "t_departement";
    const COLUMNS: &'static str = "id, department_code, department_name";

    type Create = DepartementCreate;
    type Patch = DepartementPatch;
}

impl Changeset for DepartementCreate {
    fn assignments(&self) -> Assignments {
        Assignments::new()
            .set("department_code", self.department_code.clone())
            .set("department_name", self.department_name.clone())
    }
}

impl Changeset for DepartementPatch {
    fn assignments(&self) -> Assignments {
        Assignments::new()
            .set_if_present("department_code", self.department_code.clone())
            .set_if_present("department_name", self.department_name.clone())
    }
}

impl Repository<Departement> {
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Departement>> {
        let departement = sqlx::query_as::<_, Departement>(
            "SELECT id, department_code, department_name FROM t_departement WHERE department_code = ?1",
        )
        .bind(code)
        .fetch_optional(self.pool())
        .await?;

        Ok(departement)
    }
}

// =============================================================================
// Commune
// =============================================================================

impl Record for Commune {
    const ENTITY: &'static str = "Commune";
    const TABLE: &'static str = "t_communes";
    const COLUMNS: &'static str = "id, city_name, postal_code, departement_id";

    type Create = CommuneCreate;
    type Patch = CommunePatch;
}

impl Changeset for CommuneCreate {
    fn assignments(&self) -> Assignments {
        Assignments::new()
            .set("city_name", self.city_name.clone())
            .set("postal_code", self.postal_code.clone())
            .set("departement_id", self.departement_id)
    }
}

impl Changeset for CommunePatch {
    fn assignments(&self) -> Assignments {
        Assignments::new()
            .set_if_present("city_name", self.city_name.clone())
            .set_if_present("postal_code", self.postal_code.clone())
            .set_if_present("departement_id", self.departement_id)
    }
}

impl Repository<Commune> {
    /// All communes sharing a postal code, ordered by name.
    pub async fn get_by_postal_code(&self, postal_code: &str) -> DbResult<Vec<Commune>> {
        debug!(postal_code = %postal_code, "Listing communes by postal code");

        let communes = sqlx::query_as::<_, Commune>(
            r#"
            SELECT id, city_name, postal_code, departement_id
            FROM t_communes
            WHERE postal_code = ?1
            ORDER BY city_name, id
            "#,
        )
        .bind(postal_code)
        .fetch_all(self.pool())
        .await?;

        Ok(communes)
    }

    /// All communes attached to the département with this code.
    pub async fn get_by_department_code(&self, department_code: &str) -> DbResult<Vec<Commune>> {
        debug!(department_code = %department_code, "Listing communes by département");

        let communes = sqlx::query_as::<_, Commune>(
            r#"
            SELECT c.id, c.city_name, c.postal_code, c.departement_id
            FROM t_communes c
            INNER JOIN t_departement d ON d.id = c.departement_id
            WHERE d.department_code = ?1
            ORDER BY c.city_name, c.id
            "#,
        )
        .bind(department_code)
        .fetch_all(self.pool())
        .await?;

        Ok(communes)
    }

    /// Communes whose name contains `pattern`.
    ///
    /// SQLite's LIKE folds ASCII case only, so "saint" matches "Saint"
    /// but "é" does not match "É".
    pub async fn search_by_name(&self, pattern: &str, limit: u32) -> DbResult<Vec<Commune>> {
        debug!(pattern = %pattern, "Searching communes by name");

        let escaped = pattern
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");

        let communes = sqlx::query_as::<_, Commune>(
            r#"
            SELECT id, city_name, postal_code, departement_id
            FROM t_communes
            WHERE city_name LIKE '%' || ?1 || '%' ESCAPE '\'
            ORDER BY city_name, id
            LIMIT ?2
            "#,
        )
        .bind(escaped)
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await?;

        Ok(communes)
    }
}
