//! # Order Repository
//!
//! Table mapping for `orders`. Order lines live in
//! [`OrderItemRepository`](super::OrderItemRepository).

use digicheese_core::{Order, OrderCreate, OrderPatch};
use tracing::debug;

use super::{Assignments, Changeset, Record, Repository};
use crate::error::DbResult;

impl Record for Order {
    const ENTITY: &'static str = "Order";
    const TABLE: &'static str = "orders";
    const COLUMNS: &'static str = "id, order_date, client_id, status, total_amount_cents, \
         shipping_cost_cents, notes, created_at, shipped_at, delivered_at";

    type Create = OrderCreate;
    type Patch = OrderPatch;
}

impl Changeset for OrderCreate {
    fn assignments(&self) -> Assignments {
        // order_date left out when absent so the column default applies
        Assignments::new()
            .set_if_present("order_date", self.order_date)
            .set("client_id", self.client_id)
            .set("status", self.status)
            .set("total_amount_cents", self.total_amount_cents)
            .set("shipping_cost_cents", self.shipping_cost_cents)
            .set("notes", self.notes.clone())
    }
}

impl Changeset for OrderPatch {
    fn assignments(&self) -> Assignments {
        Assignments::new()
            .set_if_present("status", self.status)
            .set_if_present("total_amount_cents", self.total_amount_cents)
            .set_if_present("shipping_cost_cents", self.shipping_cost_cents)
            .set_if_present("notes", self.notes.clone())
            .set_if_present("shipped_at", self.shipped_at)
            .set_if_present("delivered_at", self.delivered_at)
    }
}

impl Repository<Order> {
    /// Orders placed by one client, oldest first.
    pub async fn list_by_client(&self, client_id: i64, limit: u32) -> DbResult<Vec<Order>> {
        debug!(client_id, limit, "Listing orders by client");

        let sql = format!(
            "SELECT {} FROM orders WHERE client_id = ?1 ORDER BY order_date, id LIMIT ?2",
            Order::COLUMNS
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(client_id)
            .bind(i64::from(limit))
            .fetch_all(self.pool())
            .await?;

        Ok(orders)
    }
}
