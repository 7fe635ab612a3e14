//! Orders (`orders`) and their lines (`order_items`).
//!
//! ## Order Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Order #12   client 4   status: preparing                               │
//! │  ─────────────────────────────────────────────────────────────────────  │
//! │  OrderItem (12, 3)   Comté 18 mois     2 × 24.90  =  49.80              │
//! │  OrderItem (12, 7)   Morbier           1 × 18.90  =  18.90              │
//! │  ─────────────────────────────────────────────────────────────────────  │
//! │  total_amount_cents   6870   (as stored, set by the caller)             │
//! │  shipping_cost_cents   590                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are stored values, not recomputed from the lines. The status
//! is recorded and patched as-is; nothing here enforces transitions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::normalize::{double_option, Normalize};
use crate::validation::{
    validate_amount, validate_id, validate_nullable_text, validate_optional_text, validate_quantity,
};

const NOTES_MAX: usize = 500;

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle label of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Returns the stored text form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order
// =============================================================================

/// A client order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,

    /// Day the order was placed (defaults to today).
    pub order_date: NaiveDate,

    pub client_id: i64,

    pub status: OrderStatus,

    /// Goods total in cents.
    pub total_amount_cents: i64,

    pub shipping_cost_cents: i64,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,

    pub shipped_at: Option<DateTime<Utc>>,

    pub delivered_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Goods total plus shipping, `None` on overflow.
    pub fn grand_total(&self) -> Option<Money> {
        Money::from_cents(self.total_amount_cents).checked_add(Money::from_cents(self.shipping_cost_cents))
    }
}

/// Body of `POST /api/v1/orders`.
///
/// A missing `order_date` lets the database fill in today's date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreate {
    #[serde(default)]
    pub order_date: Option<NaiveDate>,
    pub client_id: i64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub total_amount_cents: i64,
    #[serde(default)]
    pub shipping_cost_cents: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl OrderCreate {
    /// Creates an empty pending order for a client.
    pub fn for_client(client_id: i64) -> Self {
        OrderCreate {
            order_date: None,
            client_id,
            status: OrderStatus::Pending,
            total_amount_cents: 0,
            shipping_cost_cents: 0,
            notes: None,
        }
    }
}

/// Body of `PATCH /api/v1/orders/{id}`.
///
/// `notes`, `shipped_at` and `delivered_at` distinguish an absent field
/// (unchanged) from an explicit `null` (cleared).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub total_amount_cents: Option<i64>,
    pub shipping_cost_cents: Option<i64>,
    #[serde(deserialize_with = "double_option::deserialize", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(deserialize_with = "double_option::deserialize", skip_serializing_if = "Option::is_none")]
    pub shipped_at: Option<Option<DateTime<Utc>>>,
    #[serde(deserialize_with = "double_option::deserialize", skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<Option<DateTime<Utc>>>,
}

impl Normalize for OrderCreate {
    fn normalize(self) -> ValidationResult<Self> {
        validate_id("client_id", self.client_id)?;
        validate_amount("total_amount_cents", self.total_amount_cents)?;
        validate_amount("shipping_cost_cents", self.shipping_cost_cents)?;

        Ok(OrderCreate {
            notes: validate_optional_text("notes", self.notes, NOTES_MAX)?,
            ..self
        })
    }
}

impl Normalize for OrderPatch {
    fn normalize(self) -> ValidationResult<Self> {
        if let Some(total) = self.total_amount_cents {
            validate_amount("total_amount_cents", total)?;
        }
        if let Some(shipping) = self.shipping_cost_cents {
            validate_amount("shipping_cost_cents", shipping)?;
        }

        Ok(OrderPatch {
            notes: validate_nullable_text("notes", self.notes, NOTES_MAX)?,
            ..self
        })
    }
}

// =============================================================================
// Order Items
// =============================================================================

/// One product line of an order, keyed by `(order_id, product_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
}

/// Body of `POST /api/v1/orders/{id}/items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemCreate {
    pub product_id: i64,
    pub quantity: i64,
}

/// Body of `PATCH /api/v1/orders/{id}/items/{product_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderItemPatch {
    pub quantity: Option<i64>,
}

impl Normalize for OrderItemCreate {
    fn normalize(self) -> ValidationResult<Self> {
        validate_id("product_id", self.product_id)?;
        validate_quantity(self.quantity)?;
        Ok(self)
    }
}

impl Normalize for OrderItemPatch {
    fn normalize(self) -> ValidationResult<Self> {
        if let Some(quantity) = self.quantity {
            validate_quantity(quantity)?;
        }
        Ok(self)
    }
}

/// An order line joined with the product it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItemWithProduct {
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub line_total_cents: i64,
}

/// `GET /api/v1/orders/{id}/details` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemWithProduct>,
    /// Sum of the line totals at current product prices.
    pub items_total_cents: i64,
    /// Stored `total_amount_cents` plus `shipping_cost_cents`.
    pub grand_total_cents: i64,
}

impl OrderWithItems {
    /// Builds the details view. Totals that would not fit in `i64` are
    /// rejected rather than wrapped.
    pub fn new(order: Order, items: Vec<OrderItemWithProduct>) -> ValidationResult<Self> {
        let items_total = Money::checked_sum(items.iter().map(|item| Money::from_cents(item.line_total_cents)))
            .ok_or_else(|| overflow("items_total_cents"))?;
        let grand_total = order.grand_total().ok_or_else(|| overflow("grand_total_cents"))?;

        Ok(OrderWithItems {
            order,
            items,
            items_total_cents: items_total.cents(),
            grand_total_cents: grand_total.cents(),
        })
    }
}

fn overflow(field: &str) -> ValidationError {
    ValidationError::Overflow {
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order {
            id: 1,
            order_date: NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
            client_id: 4,
            status: OrderStatus::Pending,
            total_amount_cents: 6870,
            shipping_cost_cents: 590,
            notes: None,
            created_at: Utc::now(),
            shipped_at: None,
            delivered_at: None,
        }
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&OrderStatus::Shipped).unwrap(), "\"shipped\"");
        let status: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, OrderStatus::Cancelled);
        assert!(serde_json::from_str::<OrderStatus>("\"lost\"").is_err());
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_grand_total() {
        assert_eq!(sample_order().grand_total(), Some(Money::from_cents(7460)));

        let mut order = sample_order();
        order.total_amount_cents = i64::MAX;
        assert_eq!(order.grand_total(), None);
    }

    #[test]
    fn test_order_create_defaults_from_json() {
        let order: OrderCreate = serde_json::from_str(r#"{"client_id": 4}"#).unwrap();
        assert_eq!(order, OrderCreate::for_client(4));
    }

    #[test]
    fn test_order_create_rejects_negative_amount() {
        let mut order = OrderCreate::for_client(4);
        order.shipping_cost_cents = -10;
        assert!(order.normalize().is_err());
    }

    #[test]
    fn test_order_rejects_amounts_past_the_cap() {
        let mut order = OrderCreate::for_client(4);
        order.total_amount_cents = crate::MAX_AMOUNT_CENTS + 1;
        assert!(matches!(
            order.normalize(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_order_patch_distinguishes_null_from_absent() {
        let patch: OrderPatch = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        assert_eq!(patch.notes, Some(None));
        assert_eq!(patch.shipped_at, None);

        let patch: OrderPatch = serde_json::from_str(r#"{"status": "shipped"}"#).unwrap();
        assert_eq!(patch.notes, None);

        let patch = OrderPatch {
            notes: Some(Some("  ".to_string())),
            ..Default::default()
        }
        .normalize()
        .unwrap();
        assert_eq!(patch.notes, Some(None));
    }

    #[test]
    fn test_order_item_quantity_is_capped() {
        let item = OrderItemCreate {
            product_id: 3,
            quantity: 5_000_000_000_000_000_000,
        };
        assert!(matches!(
            item.normalize(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_order_item_quantity_must_be_positive() {
        let item = OrderItemCreate {
            product_id: 3,
            quantity: 0,
        };
        assert!(item.normalize().is_err());

        let patch = OrderItemPatch { quantity: Some(-1) };
        assert!(patch.normalize().is_err());
    }

    #[test]
    fn test_order_with_items_totals_lines() {
        let items = vec![
            OrderItemWithProduct {
                order_id: 1,
                product_id: 3,
                product_name: "Comté 18 mois".to_string(),
                unit_price_cents: 2490,
                quantity: 2,
                line_total_cents: 4980,
            },
            OrderItemWithProduct {
                order_id: 1,
                product_id: 7,
                product_name: "Morbier".to_string(),
                unit_price_cents: 1890,
                quantity: 1,
                line_total_cents: 1890,
            },
        ];

        let details = OrderWithItems::new(sample_order(), items).unwrap();
        assert_eq!(details.items_total_cents, 6870);
        assert_eq!(details.grand_total_cents, 7460);

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["client_id"], 4);
        assert_eq!(json["grand_total_cents"], 7460);
        assert_eq!(json["items"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_order_with_items_rejects_overflowing_total() {
        let line = |product_id| OrderItemWithProduct {
            order_id: 1,
            product_id,
            product_name: "Cancoillotte".to_string(),
            unit_price_cents: 1,
            quantity: 5_000_000_000_000_000_000,
            line_total_cents: 5_000_000_000_000_000_000,
        };

        let err = OrderWithItems::new(sample_order(), vec![line(1), line(2)]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Overflow {
                field: "items_total_cents".to_string()
            }
        );
    }
}
