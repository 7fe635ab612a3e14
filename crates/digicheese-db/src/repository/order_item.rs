//! # Order Item Repository
//!
//! Lines of an order, keyed by `(order_id, product_id)`.
//!
//! ## Adding The Same Product Twice
//! ```text
//! add(12, { product_id: 3, quantity: 2 })   → (12, 3) qty 2
//! add(12, { product_id: 3, quantity: 1 })   → (12, 3) qty 3   (merged)
//! ```

use digicheese_core::{OrderItem, OrderItemCreate, OrderItemWithProduct};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for the `order_items` link table.
#[derive(Debug, Clone)]
pub struct OrderItemRepository {
    pool: SqlitePool,
}

impl OrderItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderItemRepository { pool }
    }

    /// Lines of an order, in product id order.
    pub async fn list_for_order(&self, order_id: i64) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT order_id, product_id, quantity
            FROM order_items
            WHERE order_id = ?1
            ORDER BY product_id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lines of an order joined with product name and current price.
    pub async fn list_with_products(&self, order_id: i64) -> DbResult<Vec<OrderItemWithProduct>> {
        let items = sqlx::query_as::<_, OrderItemWithProduct>(
            r#"
            SELECT
                oi.order_id,
                oi.product_id,
                p.name AS product_name,
                p.unit_price_cents,
                oi.quantity,
                oi.quantity * p.unit_price_cents AS line_total_cents
            FROM order_items oi
            INNER JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = ?1
            ORDER BY oi.product_id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn get(&self, order_id: i64, product_id: i64) -> DbResult<Option<OrderItem>> {
        let item = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT order_id, product_id, quantity
            FROM order_items
            WHERE order_id = ?1 AND product_id = ?2
            "#,
        )
        .bind(order_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Adds a product to an order, merging with an existing line.
    pub async fn add(&self, order_id: i64, item: &OrderItemCreate) -> DbResult<OrderItem> {
        debug!(order_id, product_id = item.product_id, quantity = item.quantity, "Adding order item");

        let stored = sqlx::query_as::<_, OrderItem>(
            r#"
            INSERT INTO order_items (order_id, product_id, quantity)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (order_id, product_id)
            DO UPDATE SET quantity = quantity + excluded.quantity
            RETURNING order_id, product_id, quantity
            "#,
        )
        .bind(order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    /// Sets the quantity of an existing line. `None` if the line doesn't exist.
    pub async fn update_quantity(
        &self,
        order_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> DbResult<Option<OrderItem>> {
        debug!(order_id, product_id, quantity, "Updating order item quantity");

        let item = sqlx::query_as::<_, OrderItem>(
            r#"
            UPDATE order_items
            SET quantity = ?3
            WHERE order_id = ?1 AND product_id = ?2
            RETURNING order_id, product_id, quantity
            "#,
        )
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Removes a line. Returns `false` when it didn't exist.
    pub async fn remove(&self, order_id: i64, product_id: i64) -> DbResult<bool> {
        debug!(order_id, product_id, "Removing order item");

        let result = sqlx::query("DELETE FROM order_items WHERE order_id = ?1 AND product_id = ?2")
            .bind(order_id)
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digicheese_core::{ClientCreate, Order, OrderCreate, ProductCreate};

    use crate::error::DbError;
    use crate::pool::Database;
    use crate::repository::testing::test_db;

    async fn order_with_products(db: &Database) -> (Order, i64, i64) {
        let client = db
            .clients()
            .create(&ClientCreate::new("Jean", "DUPONT"))
            .await
            .unwrap();
        let order = db
            .orders()
            .create(&OrderCreate::for_client(client.id))
            .await
            .unwrap();
        let comte = db
            .products()
            .create(&ProductCreate::new("Comté", 2490, 500))
            .await
            .unwrap();
        let morbier = db
            .products()
            .create(&ProductCreate::new("Morbier", 1890, 400))
            .await
            .unwrap();
        (order, comte.id, morbier.id)
    }

    fn line(product_id: i64, quantity: i64) -> OrderItemCreate {
        OrderItemCreate {
            product_id,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_add_and_list_with_products() {
        let db = test_db().await;
        let (order, comte, morbier) = order_with_products(&db).await;
        let items = db.order_items();

        items.add(order.id, &line(comte, 2)).await.unwrap();
        items.add(order.id, &line(morbier, 1)).await.unwrap();

        let details = items.list_with_products(order.id).await.unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].product_name, "Comté");
        assert_eq!(details[0].line_total_cents, 4980);
        assert_eq!(details[1].line_total_cents, 1890);
    }

    #[tokio::test]
    async fn test_add_same_product_merges_quantity() {
        let db = test_db().await;
        let (order, comte, _) = order_with_products(&db).await;
        let items = db.order_items();

        items.add(order.id, &line(comte, 2)).await.unwrap();
        let merged = items.add(order.id, &line(comte, 1)).await.unwrap();

        assert_eq!(merged.quantity, 3);
        assert_eq!(items.list_for_order(order.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_quantity_cap_is_enforced_by_schema() {
        let db = test_db().await;
        let (order, comte, morbier) = order_with_products(&db).await;
        let items = db.order_items();

        let err = items
            .add(order.id, &line(morbier, 5_000_000_000_000_000_000))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));

        items.add(order.id, &line(comte, 999_999)).await.unwrap();
        let err = items.add(order.id, &line(comte, 2)).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
        assert_eq!(items.get(order.id, comte).await.unwrap().map(|i| i.quantity), Some(999_999));
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let db = test_db().await;
        let (order, comte, morbier) = order_with_products(&db).await;
        let items = db.order_items();
        items.add(order.id, &line(comte, 2)).await.unwrap();

        let updated = items.update_quantity(order.id, comte, 5).await.unwrap();
        assert_eq!(updated.map(|i| i.quantity), Some(5));
        assert_eq!(items.update_quantity(order.id, morbier, 5).await.unwrap(), None);

        assert!(items.remove(order.id, comte).await.unwrap());
        assert!(!items.remove(order.id, comte).await.unwrap());
        assert_eq!(items.get(order.id, comte).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unknown_product_is_rejected() {
        let db = test_db().await;
        let (order, _, _) = order_with_products(&db).await;

        let err = db.order_items().add(order.id, &line(404, 1)).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_deleting_order_cascades_to_items() {
        let db = test_db().await;
        let (order, comte, _) = order_with_products(&db).await;
        db.order_items().add(order.id, &line(comte, 1)).await.unwrap();

        assert!(db.orders().delete(order.id).await.unwrap());
        assert!(db.order_items().list_for_order(order.id).await.unwrap().is_empty());
    }
}
