//! `/api/v1/orders`: orders and their product lines.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use digicheese_core::{
    Order, OrderItem, OrderItemCreate, OrderItemPatch, OrderItemWithProduct, OrderWithItems,
};

use super::{accept, crud_routes, path_id, JsonBody, ListParams, PathParams, QueryParams};
use crate::error::ApiResult;
use crate::AppState;

const BASE: &str = "/api/v1/orders";

pub fn routes() -> Router<AppState> {
    crud_routes::<Order>(BASE)
        .route(&format!("{BASE}/by-client/{{client_id}}"), get(by_client))
        .route(&format!("{BASE}/{{id}}/details"), get(details))
        .route(&format!("{BASE}/{{id}}/items"), get(items).post(add_item))
        .route(
            &format!("{BASE}/{{id}}/items/{{product_id}}"),
            axum::routing::patch(update_item).delete(remove_item),
        )
}

/// GET /api/v1/orders/by-client/{client_id}
async fn by_client(
    State(state): State<AppState>,
    client_id: PathParams<i64>,
    params: QueryParams<ListParams>,
) -> ApiResult<Json<Vec<Order>>> {
    let Path(client_id) = accept(client_id)?;
    let client_id = path_id("client_id", client_id)?;
    let Query(params) = accept(params)?;
    let limit = params.resolve(&state)?;

    Ok(Json(state.services.orders().by_client(client_id, limit).await?))
}

/// GET /api/v1/orders/{id}/details
async fn details(State(state): State<AppState>, id: PathParams<i64>) -> ApiResult<Json<OrderWithItems>> {
    let Path(id) = accept(id)?;
    let id = path_id("id", id)?;

    Ok(Json(state.services.orders().details(id).await?))
}

/// GET /api/v1/orders/{id}/items
async fn items(
    State(state): State<AppState>,
    id: PathParams<i64>,
) -> ApiResult<Json<Vec<OrderItemWithProduct>>> {
    let Path(id) = accept(id)?;
    let id = path_id("id", id)?;

    Ok(Json(state.services.orders().items(id).await?))
}

/// POST /api/v1/orders/{id}/items
async fn add_item(
    State(state): State<AppState>,
    id: PathParams<i64>,
    body: JsonBody<OrderItemCreate>,
) -> ApiResult<(StatusCode, Json<OrderItem>)> {
    let Path(id) = accept(id)?;
    let id = path_id("id", id)?;
    let Json(item) = accept(body)?;

    let stored = state.services.orders().add_item(id, item).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

fn item_path(params: PathParams<(i64, i64)>) -> ApiResult<(i64, i64)> {
    let Path((order_id, product_id)) = accept(params)?;
    Ok((path_id("id", order_id)?, path_id("product_id", product_id)?))
}

/// PATCH /api/v1/orders/{id}/items/{product_id}
async fn update_item(
    State(state): State<AppState>,
    params: PathParams<(i64, i64)>,
    body: JsonBody<OrderItemPatch>,
) -> ApiResult<Json<OrderItem>> {
    let (order_id, product_id) = item_path(params)?;
    let Json(patch) = accept(body)?;

    Ok(Json(
        state
            .services
            .orders()
            .update_item(order_id, product_id, patch)
            .await?,
    ))
}

/// DELETE /api/v1/orders/{id}/items/{product_id}
async fn remove_item(
    State(state): State<AppState>,
    params: PathParams<(i64, i64)>,
) -> ApiResult<StatusCode> {
    let (order_id, product_id) = item_path(params)?;

    state.services.orders().remove_item(order_id, product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
