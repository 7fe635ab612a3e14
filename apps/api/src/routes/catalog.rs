//! `/api/v1/product-categories` and `/api/v1/products`.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use digicheese_core::{Product, ProductCategory};

use super::{accept, crud_routes, path_id, ListParams, PathParams, QueryParams};
use crate::error::ApiResult;
use crate::AppState;

const CATEGORIES: &str = "/api/v1/product-categories";
const PRODUCTS: &str = "/api/v1/products";

pub fn routes() -> Router<AppState> {
    crud_routes::<ProductCategory>(CATEGORIES)
        .route(&format!("{CATEGORIES}/{{id}}/products"), get(category_products))
        .merge(crud_routes::<Product>(PRODUCTS))
        .route(&format!("{PRODUCTS}/low-stock"), get(low_stock))
}

/// GET /api/v1/product-categories/{id}/products
async fn category_products(
    State(state): State<AppState>,
    id: PathParams<i64>,
    params: QueryParams<ListParams>,
) -> ApiResult<Json<Vec<Product>>> {
    let Path(id) = accept(id)?;
    let id = path_id("id", id)?;
    let Query(params) = accept(params)?;
    let limit = params.resolve(&state)?;

    Ok(Json(state.services.product_categories().products(id, limit).await?))
}

/// GET /api/v1/products/low-stock
async fn low_stock(
    State(state): State<AppState>,
    params: QueryParams<ListParams>,
) -> ApiResult<Json<Vec<Product>>> {
    let Query(params) = accept(params)?;
    let limit = params.resolve(&state)?;

    Ok(Json(state.services.products().low_stock(limit).await?))
}
