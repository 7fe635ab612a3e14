//! Product catalog: categories (`product_categories`) and products
//! (`products`).

use serde::{Deserialize, Serialize};

use crate::error::ValidationResult;
use crate::money::Money;
use crate::normalize::{double_option, Normalize};
use crate::validation::{
    validate_amount, validate_id, validate_non_negative, validate_nullable, validate_nullable_text,
    validate_optional_text, validate_text,
};
use crate::DEFAULT_STOCK_ALERT_THRESHOLD;

const CATEGORY_NAME_MAX: usize = 100;
const CATEGORY_DESCRIPTION_MAX: usize = 255;
const PRODUCT_NAME_MAX: usize = 100;
const PRODUCT_DESCRIPTION_MAX: usize = 500;

// =============================================================================
// Product Category
// =============================================================================

/// A family of products ("Pâtes pressées cuites", "Chèvres", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductCategory {
    pub id: i64,

    /// Unique.
    pub name: String,

    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCategoryCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductCategoryPatch {
    pub name: Option<String>,
    #[serde(deserialize_with = "double_option::deserialize", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl Normalize for ProductCategoryCreate {
    fn normalize(self) -> ValidationResult<Self> {
        Ok(ProductCategoryCreate {
            name: validate_text("name", &self.name, CATEGORY_NAME_MAX)?,
            description: validate_optional_text("description", self.description, CATEGORY_DESCRIPTION_MAX)?,
        })
    }
}

impl Normalize for ProductCategoryPatch {
    fn normalize(self) -> ValidationResult<Self> {
        Ok(ProductCategoryPatch {
            name: self
                .name
                .as_deref()
                .map(|name| validate_text("name", name, CATEGORY_NAME_MAX))
                .transpose()?,
            description: validate_nullable_text("description", self.description, CATEGORY_DESCRIPTION_MAX)?,
        })
    }
}

// =============================================================================
// Product
// =============================================================================

/// A cheese or grocery item sold by the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,

    pub name: String,

    pub description: Option<String>,

    /// Price per unit in cents.
    pub unit_price_cents: i64,

    /// Shipping weight per unit.
    pub weight_grams: i64,

    pub category_id: Option<i64>,

    pub stock_quantity: i64,

    /// Stock level at or below which the product is reported as low.
    pub stock_alert_threshold: i64,

    /// Inactive products stay in past orders but are no longer sold.
    pub is_active: bool,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Checks if stock has fallen to the alert threshold.
    ///
    /// ## Example
    /// ```rust
    /// use digicheese_core::types::Product;
    ///
    /// let mut comte = Product {
    ///     id: 1,
    ///     name: "Comté 18 mois".to_string(),
    ///     description: None,
    ///     unit_price_cents: 2490,
    ///     weight_grams: 500,
    ///     category_id: None,
    ///     stock_quantity: 6,
    ///     stock_alert_threshold: 5,
    ///     is_active: true,
    /// };
    /// assert!(!comte.is_low_stock());
    ///
    /// comte.stock_quantity = 5;
    /// assert!(comte.is_low_stock());
    /// ```
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.stock_alert_threshold
    }
}

fn default_alert_threshold() -> i64 {
    DEFAULT_STOCK_ALERT_THRESHOLD
}

fn default_active() -> bool {
    true
}

/// Body of `POST /api/v1/products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub unit_price_cents: i64,
    #[serde(default)]
    pub weight_grams: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default = "default_alert_threshold")]
    pub stock_alert_threshold: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl ProductCreate {
    /// Creates an active product with no stock.
    pub fn new(name: impl Into<String>, unit_price_cents: i64, weight_grams: i64) -> Self {
        ProductCreate {
            name: name.into(),
            description: None,
            unit_price_cents,
            weight_grams,
            category_id: None,
            stock_quantity: 0,
            stock_alert_threshold: DEFAULT_STOCK_ALERT_THRESHOLD,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPatch {
    pub name: Option<String>,
    #[serde(deserialize_with = "double_option::deserialize", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    pub unit_price_cents: Option<i64>,
    pub weight_grams: Option<i64>,
    /// `null` detaches the product from its category.
    #[serde(deserialize_with = "double_option::deserialize", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<i64>>,
    pub stock_quantity: Option<i64>,
    pub stock_alert_threshold: Option<i64>,
    pub is_active: Option<bool>,
}

fn non_negative(field: &str, value: Option<i64>) -> ValidationResult<Option<i64>> {
    if let Some(v) = value {
        validate_non_negative(field, v)?;
    }
    Ok(value)
}

fn normalize_category_id(value: Option<i64>) -> ValidationResult<Option<i64>> {
    value.map(|id| validate_id("category_id", id)).transpose()
}

impl Normalize for ProductCreate {
    fn normalize(self) -> ValidationResult<Self> {
        validate_amount("unit_price_cents", self.unit_price_cents)?;
        validate_non_negative("weight_grams", self.weight_grams)?;
        validate_non_negative("stock_quantity", self.stock_quantity)?;
        validate_non_negative("stock_alert_threshold", self.stock_alert_threshold)?;

        Ok(ProductCreate {
            name: validate_text("name", &self.name, PRODUCT_NAME_MAX)?,
            description: validate_optional_text("description", self.description, PRODUCT_DESCRIPTION_MAX)?,
            category_id: normalize_category_id(self.category_id)?,
            ..self
        })
    }
}

impl Normalize for ProductPatch {
    fn normalize(self) -> ValidationResult<Self> {
        Ok(ProductPatch {
            name: self
                .name
                .as_deref()
                .map(|name| validate_text("name", name, PRODUCT_NAME_MAX))
                .transpose()?,
            description: validate_nullable_text("description", self.description, PRODUCT_DESCRIPTION_MAX)?,
            unit_price_cents: self
                .unit_price_cents
                .map(|cents| validate_amount("unit_price_cents", cents).map(|()| cents))
                .transpose()?,
            weight_grams: non_negative("weight_grams", self.weight_grams)?,
            category_id: validate_nullable(self.category_id, |id| validate_id("category_id", id))?,
            stock_quantity: non_negative("stock_quantity", self.stock_quantity)?,
            stock_alert_threshold: non_negative("stock_alert_threshold", self.stock_alert_threshold)?,
            is_active: self.is_active,
        })
    }
}
