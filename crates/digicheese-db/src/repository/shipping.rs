//! # Shipping Rate Repository

use digicheese_core::{ShippingRate, ShippingRateCreate, ShippingRatePatch};
use tracing::debug;

use super::{Assignments, Changeset, Record, Repository};
use crate::error::DbResult;

impl Record for ShippingRate {
    const ENTITY: &'static str = "ShippingRate";
    const TABLE: &'static str = "shipping_rates";
    const COLUMNS: &'static str = "id, weight_min_grams, weight_max_grams, cost_cents, description";

    type Create = ShippingRateCreate;
    type Patch = ShippingRatePatch;
}

impl Changeset for ShippingRateCreate {
    fn assignments(&self) -> Assignments {
        Assignments::new()
            .set("weight_min_grams", self.weight_min_grams)
            .set("weight_max_grams", self.weight_max_grams)
            .set("cost_cents", self.cost_cents)
            .set("description", self.description.clone())
    }
}

impl Changeset for ShippingRatePatch {
    fn assignments(&self) -> Assignments {
        Assignments::new()
            .set_if_present("weight_min_grams", self.weight_min_grams)
            .set_if_present("weight_max_grams", self.weight_max_grams)
            .set_if_present("cost_cents", self.cost_cents)
            .set_if_present("description", self.description.clone())
    }
}

impl Repository<ShippingRate> {
    /// The band covering `weight_grams`.
    ///
    /// Overlapping bands resolve to the narrowest one; an unbounded band
    /// only wins when no bounded band matches.
    pub async fn find_for_weight(&self, weight_grams: i64) -> DbResult<Option<ShippingRate>> {
        debug!(weight_grams, "Looking up shipping rate");

        let sql = format!(
            "SELECT {} FROM shipping_rates WHERE weight_min_grams <= ?1",
            ShippingRate::COLUMNS
        );
        let candidates = sqlx::query_as::<_, ShippingRate>(&sql)
            .bind(weight_grams)
            .fetch_all(self.pool())
            .await?;

        Ok(ShippingRate::narrowest_covering(candidates, weight_grams))
    }
}
