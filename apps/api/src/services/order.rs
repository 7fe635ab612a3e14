//! # Order Services
//!
//! Orders plus their product lines.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Order #12 (client 3, pending)                                          │
//! │   ├── (12, product 4) × 2    add_item merges repeated products          │
//! │   └── (12, product 9) × 1    update_item / remove_item by product id    │
//! │                                                                         │
//! │  details(12) ──► OrderWithItems { order, items, items/grand totals }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Line edits do not rewrite `total_amount_cents`; the stored total is
//! whatever the caller last set, and `items_total_cents` in the details
//! view is always recomputed from the lines.

use digicheese_core::validation::validate_quantity;
use digicheese_core::{
    Normalize, Order, OrderItem, OrderItemCreate, OrderItemPatch, OrderItemWithProduct,
    OrderWithItems,
};
use tracing::info;

use super::{found, Service, ServiceError, ServiceResult};

const ORDER_ITEM: &str = "OrderItem";

fn item_key(order_id: i64, product_id: i64) -> String {
    format!("order {order_id}, product {product_id}")
}

impl Service<Order> {
    /// Orders of one client, by id. 404 when the client is unknown.
    pub async fn by_client(&self, client_id: i64, limit: u32) -> ServiceResult<Vec<Order>> {
        found(
            self.db().clients().get_by_id(client_id).await?,
            "Client",
            client_id,
        )?;

        Ok(self.repository().list_by_client(client_id, limit).await?)
    }

    /// The order with its lines joined to product name and price.
    pub async fn details(&self, order_id: i64) -> ServiceResult<OrderWithItems> {
        let order = self.get_by_id(order_id).await?;
        let items = self.db().order_items().list_with_products(order_id).await?;

        Ok(OrderWithItems::new(order, items)?)
    }

    pub async fn items(&self, order_id: i64) -> ServiceResult<Vec<OrderItemWithProduct>> {
        self.get_by_id(order_id).await?;
        Ok(self.db().order_items().list_with_products(order_id).await?)
    }

    /// Adds a product line. Adding a product already on the order raises
    /// its quantity instead of creating a second line; the merged quantity
    /// obeys the same cap as a new line.
    pub async fn add_item(&self, order_id: i64, item: OrderItemCreate) -> ServiceResult<OrderItem> {
        let item = item.normalize()?;
        self.get_by_id(order_id).await?;

        let items = self.db().order_items();
        if let Some(existing) = items.get(order_id, item.product_id).await? {
            validate_quantity(existing.quantity + item.quantity)?;
        }

        let stored = items.add(order_id, &item).await?;
        info!(
            order_id,
            product_id = stored.product_id,
            quantity = stored.quantity,
            "Order item added"
        );
        Ok(stored)
    }

    /// Changes a line's quantity. An empty patch returns the line as is.
    pub async fn update_item(
        &self,
        order_id: i64,
        product_id: i64,
        patch: OrderItemPatch,
    ) -> ServiceResult<OrderItem> {
        let patch = patch.normalize()?;
        let items = self.db().order_items();

        let updated = match patch.quantity {
            Some(quantity) => items.update_quantity(order_id, product_id, quantity).await?,
            None => items.get(order_id, product_id).await?,
        };

        let updated = found(updated, ORDER_ITEM, item_key(order_id, product_id))?;
        info!(order_id, product_id, quantity = updated.quantity, "Order item updated");
        Ok(updated)
    }

    pub async fn remove_item(&self, order_id: i64, product_id: i64) -> ServiceResult<()> {
        if !self.db().order_items().remove(order_id, product_id).await? {
            return Err(ServiceError::not_found(ORDER_ITEM, item_key(order_id, product_id)));
        }

        info!(order_id, product_id, "Order item removed");
        Ok(())
    }
}
