//! `/api/v1/communes` and `/api/v1/departements`: French geography.
//!
//! Search endpoints check parameter lengths first (422), then hand the
//! value to the service, which rejects malformed codes with 400.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use digicheese_core::geography::POSTAL_CODE_LEN;
use digicheese_core::{Commune, Departement};
use serde::{Deserialize, Serialize};

use super::{accept, check_length, crud_routes, PathParams, QueryParams};
use crate::error::ApiResult;
use crate::services::locality::{PostalDepartmentCheck, NAME_SEARCH_MIN};
use crate::AppState;

const COMMUNES: &str = "/api/v1/communes";
const DEPARTEMENTS: &str = "/api/v1/departements";

const DEPARTMENT_CODE_MIN: usize = 2;
const DEPARTMENT_CODE_MAX: usize = 3;

pub fn routes() -> Router<AppState> {
    crud_routes::<Commune>(COMMUNES)
        .route(
            &format!("{COMMUNES}/search/by-postal-code/{{postal_code}}"),
            get(by_postal_code),
        )
        .route(
            &format!("{COMMUNES}/search/by-department/{{department_code}}"),
            get(by_department),
        )
        .route(&format!("{COMMUNES}/search/by-name"), get(search_by_name))
        .route(
            &format!("{COMMUNES}/validate-postal-department"),
            post(validate_postal_department),
        )
        .route(&format!("{COMMUNES}/health"), get(communes_health))
        .merge(crud_routes::<Departement>(DEPARTEMENTS))
        .route(&format!("{DEPARTEMENTS}/by-code/{{code}}"), get(departement_by_code))
}

fn check_postal_code(value: &str) -> ApiResult<()> {
    check_length("postal_code", value, POSTAL_CODE_LEN, POSTAL_CODE_LEN)
}

fn check_department_code(value: &str) -> ApiResult<()> {
    check_length("department_code", value, DEPARTMENT_CODE_MIN, DEPARTMENT_CODE_MAX)
}

// =============================================================================
// Communes
// =============================================================================

/// GET /api/v1/communes/search/by-postal-code/{postal_code}
async fn by_postal_code(
    State(state): State<AppState>,
    postal_code: PathParams<String>,
) -> ApiResult<Json<Vec<Commune>>> {
    let Path(postal_code) = accept(postal_code)?;
    check_postal_code(&postal_code)?;

    Ok(Json(state.services.communes().by_postal_code(&postal_code).await?))
}

/// GET /api/v1/communes/search/by-department/{department_code}
async fn by_department(
    State(state): State<AppState>,
    department_code: PathParams<String>,
) -> ApiResult<Json<Vec<Commune>>> {
    let Path(department_code) = accept(department_code)?;
    check_department_code(&department_code)?;

    Ok(Json(
        state
            .services
            .communes()
            .by_department_code(&department_code)
            .await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct NameSearch {
    pub name: String,
    pub limit: Option<u32>,
}

/// GET /api/v1/communes/search/by-name?name=
async fn search_by_name(
    State(state): State<AppState>,
    query: QueryParams<NameSearch>,
) -> ApiResult<Json<Vec<Commune>>> {
    let Query(query) = accept(query)?;
    check_length("name", &query.name, NAME_SEARCH_MIN, usize::MAX)?;
    let limit = super::ListParams { limit: query.limit }.resolve(&state)?;

    Ok(Json(
        state
            .services
            .communes()
            .search_by_name(&query.name, limit)
            .await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct PostalDepartmentQuery {
    pub postal_code: String,
    pub department_code: String,
}

/// POST /api/v1/communes/validate-postal-department?postal_code=&department_code=
async fn validate_postal_department(
    query: QueryParams<PostalDepartmentQuery>,
) -> ApiResult<Json<PostalDepartmentCheck>> {
    let Query(query) = accept(query)?;
    check_postal_code(&query.postal_code)?;
    check_department_code(&query.department_code)?;

    Ok(Json(PostalDepartmentCheck::new(
        &query.postal_code,
        &query.department_code,
    )))
}

#[derive(Debug, Serialize)]
pub struct ServiceHealth {
    pub status: &'static str,
    pub service: &'static str,
}

/// GET /api/v1/communes/health
async fn communes_health() -> Json<ServiceHealth> {
    Json(ServiceHealth {
        status: "healthy",
        service: "communes",
    })
}

// =============================================================================
// Départements
// =============================================================================

/// GET /api/v1/departements/by-code/{code}
async fn departement_by_code(
    State(state): State<AppState>,
    code: PathParams<String>,
) -> ApiResult<Json<Departement>> {
    let Path(code) = accept(code)?;
    check_department_code(&code)?;

    Ok(Json(state.services.departements().by_code(&code).await?))
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::*;
    use axum::http::{Method, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};

    async fn seed(app: &Router) -> Value {
        let (status, jura) = post(
            app,
            "/api/v1/departements",
            json!({"department_code": "39", "department_name": "Jura"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        for (city, postal_code) in [("LONS-LE-SAUNIER", "39000"), ("saint-claude", "39200")] {
            let (status, _) = post(
                app,
                "/api/v1/communes",
                json!({"city_name": city, "postal_code": postal_code, "departement_id": jura["id"]}),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        jura
    }

    #[tokio::test]
    async fn test_commune_create_normalizes_and_validates() {
        let app = test_app().await;
        seed(&app).await;

        let (_, communes) = get(&app, "/api/v1/communes/search/by-postal-code/39000").await;
        assert_eq!(communes[0]["city_name"], "Lons-Le-Saunier");

        let (status, body) = post(
            &app,
            "/api/v1/communes",
            json!({"city_name": "Dole", "postal_code": "391"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_postal_code_search_lengths() {
        let app = test_app().await;
        seed(&app).await;

        let (status, _) = get(&app, "/api/v1/communes/search/by-postal-code/3900").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = get(&app, "/api/v1/communes/search/by-postal-code/39A00").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, empty) = get(&app, "/api/v1/communes/search/by-postal-code/75001").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(empty, json!([]));
    }

    #[tokio::test]
    async fn test_department_and_name_search() {
        let app = test_app().await;
        seed(&app).await;

        let (status, communes) = get(&app, "/api/v1/communes/search/by-department/39").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(communes.as_array().unwrap().len(), 2);

        let (status, _) = get(&app, "/api/v1/communes/search/by-department/3").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, found) = get(&app, "/api/v1/communes/search/by-name?name=claude").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found[0]["city_name"], "Saint-Claude");

        let (status, _) = get(&app, "/api/v1/communes/search/by-name?name=s").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_validate_postal_department() {
        let app = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/communes/validate-postal-department?postal_code=20167&department_code=2A",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"postal_code": "20167", "department_code": "2A", "is_valid": true})
        );

        let (_, body) = send(
            &app,
            Method::POST,
            "/api/v1/communes/validate-postal-department?postal_code=25000&department_code=39",
            None,
        )
        .await;
        assert_eq!(body["is_valid"], false);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/communes/validate-postal-department?postal_code=250&department_code=39",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_communes_health() {
        let app = test_app().await;
        let (status, body) = get(&app, "/api/v1/communes/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "healthy", "service": "communes"}));
    }

    #[tokio::test]
    async fn test_departements() {
        let app = test_app().await;
        let jura = seed(&app).await;

        let (status, found) = get(&app, "/api/v1/departements/by-code/39").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found, jura);

        let (status, _) = get(&app, "/api/v1/departements/by-code/25").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = post(
            &app,
            "/api/v1/departements",
            json!({"department_code": "39", "department_name": "Jura bis"}),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");

        // Deleting the département detaches its communes
        let id = jura["id"].as_i64().unwrap();
        let (status, _) = delete(&app, &format!("/api/v1/departements/{id}")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, communes) = get(&app, "/api/v1/communes").await;
        assert!(communes
            .as_array()
            .unwrap()
            .iter()
            .all(|c| c["departement_id"].is_null()));
    }
}
