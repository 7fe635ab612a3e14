//! # Product Repositories
//!
//! Table mappings for `product_categories` and `products`.
//!
//! ## Low Stock
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stock_quantity <= stock_alert_threshold  AND  is_active = 1            │
//! │                                                                         │
//! │  Comté 18 mois     stock 12   threshold 5    ok                         │
//! │  Morbier           stock  5   threshold 5    LOW  ◄── reported          │
//! │  Mont d'Or         stock  0   threshold 3    LOW  ◄── reported          │
//! │  Bleu de Gex       stock  0   inactive       ignored                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Most depleted first, so restocking starts at the top of the list.

use digicheese_core::{
    Product, ProductCategory, ProductCategoryCreate, ProductCategoryPatch, ProductCreate,
    ProductPatch,
};
use tracing::debug;

use super::{Assignments, Changeset, Record, Repository};
use crate::error::DbResult;

// =============================================================================
// Product Category
// =============================================================================

impl Record for ProductCategory {
    const ENTITY: &'static str = "ProductCategory";
    const TABLE: &'static str = "product_categories";
    const COLUMNS: &'static str = "id, name, description";

    type Create = ProductCategoryCreate;
    type Patch = ProductCategoryPatch;
}

impl Changeset for ProductCategoryCreate {
    fn assignments(&self) -> Assignments {
        Assignments::new()
            .set("name", self.name.clone())
            .set("description", self.description.clone())
    }
}

impl Changeset for ProductCategoryPatch {
    fn assignments(&self) -> Assignments {
        Assignments::new()
            .set_if_present("name", self.name.clone())
            .set_if_present("description", self.description.clone())
    }
}

// =============================================================================
// Product
// =============================================================================

impl Record for Product {
    const ENTITY: &'static str = "Product";
    const TABLE: &'static str = "products";
    const COLUMNS: &'static str = "id, name, description, unit_price_cents, weight_grams, \
         category_id, stock_quantity, stock_alert_threshold, is_active";

    type Create = ProductCreate;
    type Patch = ProductPatch;
}

impl Changeset for ProductCreate {
    fn assignments(&self) -> Assignments {
        Assignments::new()
            .set("name", self.name.clone())
            .set("description", self.description.clone())
            .set("unit_price_cents", self.unit_price_cents)
            .set("weight_grams", self.weight_grams)
            .set("category_id", self.category_id)
            .set("stock_quantity", self.stock_quantity)
            .set("stock_alert_threshold", self.stock_alert_threshold)
            .set("is_active", self.is_active)
    }
}

impl Changeset for ProductPatch {
    fn assignments(&self) -> Assignments {
        Assignments::new()
            .set_if_present("name", self.name.clone())
            .set_if_present("description", self.description.clone())
            .set_if_present("unit_price_cents", self.unit_price_cents)
            .set_if_present("weight_grams", self.weight_grams)
            .set_if_present("category_id", self.category_id)
            .set_if_present("stock_quantity", self.stock_quantity)
            .set_if_present("stock_alert_threshold", self.stock_alert_threshold)
            .set_if_present("is_active", self.is_active)
    }
}

impl Repository<Product> {
    /// Products of one category, ordered by id.
    pub async fn list_by_category(&self, category_id: i64, limit: u32) -> DbResult<Vec<Product>> {
        debug!(category_id, limit, "Listing products by category");

        let sql = format!(
            "SELECT {} FROM products WHERE category_id = ?1 ORDER BY id LIMIT ?2",
            Product::COLUMNS
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(category_id)
            .bind(i64::from(limit))
            .fetch_all(self.pool())
            .await?;

        Ok(products)
    }

    /// Products at or below their alert threshold (see
    /// [`Product::is_low_stock`]), most depleted first. Inactive products
    /// are included.
    pub async fn low_stock(&self, limit: u32) -> DbResult<Vec<Product>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM products
            WHERE stock_quantity <= stock_alert_threshold
            ORDER BY stock_quantity - stock_alert_threshold, id
            LIMIT ?1
            "#,
            Product::COLUMNS
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(i64::from(limit))
            .fetch_all(self.pool())
            .await?;

        debug!(count = products.len(), "Low-stock products");
        Ok(products)
    }
}
