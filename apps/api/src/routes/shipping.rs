//! `/api/v1/shipping-rates`: weight bands and their cost.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use digicheese_core::ShippingRate;

use super::{accept, crud_routes, PathParams};
use crate::error::ApiResult;
use crate::AppState;

const BASE: &str = "/api/v1/shipping-rates";

pub fn routes() -> Router<AppState> {
    crud_routes::<ShippingRate>(BASE).route(&format!("{BASE}/for-weight/{{grams}}"), get(for_weight))
}

/// GET /api/v1/shipping-rates/for-weight/{grams}
async fn for_weight(
    State(state): State<AppState>,
    grams: PathParams<i64>,
) -> ApiResult<Json<ShippingRate>> {
    let Path(grams) = accept(grams)?;
    Ok(Json(state.services.shipping_rates().for_weight(grams).await?))
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_for_weight() {
        let app = test_app().await;
        for (min, max, cost) in [(0, json!(500), 490), (501, json!(null), 1890)] {
            let (status, _) = post(
                &app,
                "/api/v1/shipping-rates",
                json!({"weight_min_grams": min, "weight_max_grams": max, "cost_cents": cost}),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, rate) = get(&app, "/api/v1/shipping-rates/for-weight/250").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rate["cost_cents"], 490);

        let (_, rate) = get(&app, "/api/v1/shipping-rates/for-weight/12000").await;
        assert_eq!(rate["cost_cents"], 1890);
    }

    #[tokio::test]
    async fn test_no_band_is_404() {
        let app = test_app().await;
        post(
            &app,
            "/api/v1/shipping-rates",
            json!({"weight_min_grams": 1000, "weight_max_grams": 2000, "cost_cents": 790}),
        )
        .await;

        let (status, body) = get(&app, "/api/v1/shipping-rates/for-weight/10").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_patch_null_max_makes_band_unbounded() {
        let app = test_app().await;
        let (_, band) = post(
            &app,
            "/api/v1/shipping-rates",
            json!({"weight_min_grams": 2000, "weight_max_grams": 5000, "cost_cents": 1290, "description": "Colis lourd"}),
        )
        .await;
        let uri = format!("/api/v1/shipping-rates/{}", band["id"]);

        let (status, _) = get(&app, "/api/v1/shipping-rates/for-weight/9000").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, patched) = patch(&app, &uri, json!({"weight_max_grams": null})).await;
        assert_eq!(status, StatusCode::OK);
        assert!(patched["weight_max_grams"].is_null());
        assert_eq!(patched["description"], "Colis lourd");

        let (status, rate) = get(&app, "/api/v1/shipping-rates/for-weight/9000").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rate["id"], band["id"]);

        let (status, body) = patch(&app, &uri, json!({"cost_cents": 20_000_000_000i64})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_inverted_band_is_400() {
        let app = test_app().await;

        let (status, body) = post(
            &app,
            "/api/v1/shipping-rates",
            json!({"weight_min_grams": 2000, "weight_max_grams": 1000, "cost_cents": 790}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}
