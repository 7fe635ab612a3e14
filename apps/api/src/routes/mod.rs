//! # HTTP Routes
//!
//! Every entity gets the same five endpoints from [`crud_routes`], then
//! adds its own lookups on top.
//!
//! ## Route Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    /api/v1/{entity}?limit=n   list::<R>     200                    │
//! │  POST   /api/v1/{entity}           create::<R>   201                    │
//! │  GET    /api/v1/{entity}/{id}      get::<R>      200 / 404              │
//! │  PATCH  /api/v1/{entity}/{id}      patch::<R>    200 / 404              │
//! │  DELETE /api/v1/{entity}/{id}      delete::<R>   204 / 404              │
//! │                                                                         │
//! │  {entity} = clients, communes, departements, product-categories,        │
//! │             products, orders, shipping-rates, roles, users              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Path ids must be ≥ 1 and `limit` must be within `1..=MAX_PAGE_LIMIT`;
//! anything else is rejected with 422 before a service is called.

pub mod accounts;
pub mod catalog;
pub mod clients;
pub mod locality;
pub mod orders;
pub mod shipping;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use digicheese_core::validation::{validate_id, validate_limit};
use digicheese_core::Normalize;
use digicheese_db::Record;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::services::{Service, Services};
use crate::AppState;

/// Prefix of every entity route.
pub const API_PREFIX: &str = "/api/v1";

/// All `/api/v1` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(clients::routes())
        .merge(locality::routes())
        .merge(catalog::routes())
        .merge(orders::routes())
        .merge(shipping::routes())
        .merge(accounts::routes())
}

// =============================================================================
// Request Parameters
// =============================================================================

/// `?limit=n` on list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
}

impl ListParams {
    /// The requested page size, or the configured default.
    pub fn resolve(self, state: &AppState) -> ApiResult<u32> {
        let limit = self.limit.unwrap_or(state.config.default_page_limit);
        validate_limit(limit, state.config.max_page_limit)
            .map_err(|e| ApiError::invalid_request(e.to_string()))
    }
}

/// Rejects ids below 1 with 422.
pub fn path_id(field: &str, id: i64) -> ApiResult<i64> {
    validate_id(field, id).map_err(|e| ApiError::invalid_request(e.to_string()))
}

/// Checks a path or query string's length in characters (422 otherwise).
pub fn check_length(field: &str, value: &str, min: usize, max: usize) -> ApiResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        let expected = if min == max {
            format!("exactly {min}")
        } else if max == usize::MAX {
            format!("at least {min}")
        } else {
            format!("{min} to {max}")
        };
        return Err(ApiError::invalid_request(format!(
            "{field} must be {expected} characters long"
        )));
    }
    Ok(())
}

/// Unwraps an extractor, turning its rejection into a 422 [`ApiError`].
pub fn accept<T, E: Into<ApiError>>(extracted: Result<T, E>) -> ApiResult<T> {
    extracted.map_err(Into::into)
}

pub type JsonBody<T> = Result<Json<T>, JsonRejection>;
pub type QueryParams<T> = Result<Query<T>, QueryRejection>;
pub type PathParams<T> = Result<Path<T>, PathRejection>;

// =============================================================================
// Generic CRUD
// =============================================================================

/// An entity exposed through the generic handlers.
pub trait Resource: Record {
    fn service(services: &Services) -> Service<Self>;
}

macro_rules! resource {
    ($($record:ty => $accessor:ident),* $(,)?) => {
        $(
            impl Resource for $record {
                fn service(services: &Services) -> Service<Self> {
                    services.$accessor()
                }
            }
        )*
    };
}

resource! {
    digicheese_core::Client => clients,
    digicheese_core::Commune => communes,
    digicheese_core::Departement => departements,
    digicheese_core::ProductCategory => product_categories,
    digicheese_core::Product => products,
    digicheese_core::Order => orders,
    digicheese_core::ShippingRate => shipping_rates,
    digicheese_core::Role => roles,
    digicheese_core::User => users,
}

/// List, create, get, patch and delete under `base`.
pub fn crud_routes<R>(base: &str) -> Router<AppState>
where
    R: Resource + Serialize,
    R::Create: Normalize + DeserializeOwned + 'static,
    R::Patch: Normalize + DeserializeOwned + 'static,
{
    Router::new()
        .route(base, get(list::<R>).post(create::<R>))
        .route(
            &format!("{base}/{{id}}"),
            get(get_one::<R>).patch(patch::<R>).delete(delete::<R>),
        )
}

pub async fn list<R>(
    State(state): State<AppState>,
    params: QueryParams<ListParams>,
) -> ApiResult<Json<Vec<R>>>
where
    R: Resource + Serialize,
{
    let Query(params) = accept(params)?;
    let limit = params.resolve(&state)?;

    Ok(Json(R::service(&state.services).get_all(limit).await?))
}

pub async fn get_one<R>(State(state): State<AppState>, id: PathParams<i64>) -> ApiResult<Json<R>>
where
    R: Resource + Serialize,
{
    let Path(id) = accept(id)?;
    let id = path_id("id", id)?;

    Ok(Json(R::service(&state.services).get_by_id(id).await?))
}

pub async fn create<R>(
    State(state): State<AppState>,
    body: JsonBody<R::Create>,
) -> ApiResult<(StatusCode, Json<R>)>
where
    R: Resource + Serialize,
    R::Create: Normalize + DeserializeOwned,
    R::Patch: Normalize,
{
    let Json(data) = accept(body)?;
    let created = R::service(&state.services).create(data).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn patch<R>(
    State(state): State<AppState>,
    id: PathParams<i64>,
    body: JsonBody<R::Patch>,
) -> ApiResult<Json<R>>
where
    R: Resource + Serialize,
    R::Create: Normalize,
    R::Patch: Normalize + DeserializeOwned,
{
    let Path(id) = accept(id)?;
    let id = path_id("id", id)?;
    let Json(changes) = accept(body)?;

    Ok(Json(R::service(&state.services).patch(id, changes).await?))
}

pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    id: PathParams<i64>,
) -> ApiResult<StatusCode> {
    let Path(id) = accept(id)?;
    let id = path_id("id", id)?;

    R::service(&state.services).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Test Support
// =============================================================================
