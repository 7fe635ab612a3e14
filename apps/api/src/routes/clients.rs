//! `/api/v1/clients`: loyalty-program customers.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use digicheese_core::Client;
use serde::Deserialize;

use super::{accept, crud_routes, ListParams, QueryParams};
use crate::error::ApiResult;
use crate::AppState;

const BASE: &str = "/api/v1/clients";

pub fn routes() -> Router<AppState> {
    crud_routes::<Client>(BASE)
        .route(&format!("{BASE}/search/by-email"), get(find_by_email))
        .route(&format!("{BASE}/newsletter"), get(newsletter))
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// GET /api/v1/clients/search/by-email?email=
async fn find_by_email(
    State(state): State<AppState>,
    query: QueryParams<EmailQuery>,
) -> ApiResult<Json<Client>> {
    let Query(query) = accept(query)?;
    Ok(Json(state.services.clients().find_by_email(&query.email).await?))
}

/// GET /api/v1/clients/newsletter
async fn newsletter(
    State(state): State<AppState>,
    params: QueryParams<ListParams>,
) -> ApiResult<Json<Vec<Client>>> {
    let Query(params) = accept(params)?;
    let limit = params.resolve(&state)?;

    Ok(Json(state.services.clients().newsletter_subscribers(limit).await?))
}
