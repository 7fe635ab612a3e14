//! Shipping cost lookup by parcel weight.

use digicheese_core::validation::validate_non_negative;
use digicheese_core::ShippingRate;
use tracing::debug;

use super::{found, Service, ServiceResult};

impl Service<ShippingRate> {
    /// The band a parcel of `weight_grams` falls into.
    pub async fn for_weight(&self, weight_grams: i64) -> ServiceResult<ShippingRate> {
        validate_non_negative("weight_grams", weight_grams)?;

        let rate = found(
            self.repository().find_for_weight(weight_grams).await?,
            "ShippingRate",
            format!("{weight_grams} g"),
        )?;

        debug!(weight_grams, rate_id = rate.id, cost = %rate.cost(), "Shipping rate matched");
        Ok(rate)
    }
}
