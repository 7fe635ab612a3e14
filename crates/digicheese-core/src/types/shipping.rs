//! Weight-banded shipping rates (`shipping_rates`).
//!
//! ```text
//!   0 g ──────── 500 g ──────── 2000 g ──────────────► ∞
//!   │   4.90      │    7.90      │    12.90 (no max)
//!   └─ band 1 ────┴─ band 2 ─────┴─ band 3 ───────────
//! ```
//!
//! Bands are inclusive on both ends. When bands overlap, lookups pick the
//! narrowest one that covers the weight.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::normalize::{double_option, Normalize};
use crate::validation::{validate_amount, validate_non_negative, validate_nullable_text, validate_optional_text};

const DESCRIPTION_MAX: usize = 100;

/// Shipping cost for parcels within a weight band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ShippingRate {
    pub id: i64,
    pub weight_min_grams: i64,
    /// `None` means no upper bound.
    pub weight_max_grams: Option<i64>,
    pub cost_cents: i64,
    pub description: Option<String>,
}

impl ShippingRate {
    /// Checks if a parcel weight falls inside this band.
    ///
    /// ## Example
    /// ```rust
    /// use digicheese_core::types::ShippingRate;
    ///
    /// let rate = ShippingRate {
    ///     id: 1,
    ///     weight_min_grams: 500,
    ///     weight_max_grams: Some(2000),
    ///     cost_cents: 790,
    ///     description: None,
    /// };
    /// assert!(rate.covers(500));
    /// assert!(rate.covers(2000));
    /// assert!(!rate.covers(2001));
    /// ```
    pub fn covers(&self, weight_grams: i64) -> bool {
        self.weight_min_grams <= weight_grams
            && self.weight_max_grams.map_or(true, |max| weight_grams <= max)
    }

    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Picks the band used for a parcel weight among `rates`.
    ///
    /// Bounded bands win over open-ended ones, then the narrowest band,
    /// then the lowest id.
    pub fn narrowest_covering(rates: impl IntoIterator<Item = ShippingRate>, weight_grams: i64) -> Option<ShippingRate> {
        rates
            .into_iter()
            .filter(|rate| rate.covers(weight_grams))
            .min_by_key(|rate| {
                let width = rate.weight_max_grams.map(|max| max.saturating_sub(rate.weight_min_grams));
                (width.is_none(), width, rate.id)
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRateCreate {
    pub weight_min_grams: i64,
    #[serde(default)]
    pub weight_max_grams: Option<i64>,
    pub cost_cents: i64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingRatePatch {
    pub weight_min_grams: Option<i64>,
    /// `null` removes the upper bound.
    #[serde(deserialize_with = "double_option::deserialize", skip_serializing_if = "Option::is_none")]
    pub weight_max_grams: Option<Option<i64>>,
    pub cost_cents: Option<i64>,
    #[serde(deserialize_with = "double_option::deserialize", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

fn check_band(min: Option<i64>, max: Option<i64>) -> ValidationResult<()> {
    if let Some(min) = min {
        validate_non_negative("weight_min_grams", min)?;
    }
    if let Some(max) = max {
        validate_non_negative("weight_max_grams", max)?;
    }
    if let (Some(min), Some(max)) = (min, max) {
        if max < min {
            return Err(ValidationError::InvertedRange {
                min_field: "weight_min_grams".to_string(),
                max_field: "weight_max_grams".to_string(),
            });
        }
    }
    Ok(())
}

impl Normalize for ShippingRateCreate {
    fn normalize(self) -> ValidationResult<Self> {
        check_band(Some(self.weight_min_grams), self.weight_max_grams)?;
        validate_amount("cost_cents", self.cost_cents)?;

        Ok(ShippingRateCreate {
            description: validate_optional_text("description", self.description, DESCRIPTION_MAX)?,
            ..self
        })
    }
}

// A patch carrying only one bound is checked against the stored row
// by the database, not here.
impl Normalize for ShippingRatePatch {
    fn normalize(self) -> ValidationResult<Self> {
        check_band(self.weight_min_grams, self.weight_max_grams.flatten())?;
        if let Some(cost) = self.cost_cents {
            validate_amount("cost_cents", cost)?;
        }

        Ok(ShippingRatePatch {
            description: validate_nullable_text("description", self.description, DESCRIPTION_MAX)?,
            ..self
        })
    }
}
