//! Catalog queries: products per category and the restocking list.

use digicheese_core::{Product, ProductCategory};

use super::{found, Service, ServiceResult};

impl Service<ProductCategory> {
    /// Products filed under a category. 404 when the category is unknown.
    pub async fn products(&self, category_id: i64, limit: u32) -> ServiceResult<Vec<Product>> {
        found(
            self.repository().get_by_id(category_id).await?,
            "ProductCategory",
            category_id,
        )?;

        Ok(self
            .db()
            .products()
            .list_by_category(category_id, limit)
            .await?)
    }
}

impl Service<Product> {
    /// Active products at or below their alert threshold, largest deficit first.
    pub async fn low_stock(&self, limit: u32) -> ServiceResult<Vec<Product>> {
        Ok(self.repository().low_stock(limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use crate::services::testing::test_services;
    use crate::services::ServiceError;
    use digicheese_core::{ProductCategoryCreate, ProductCreate};

    #[tokio::test]
    async fn test_category_products() {
        let services = test_services().await;
        let category = services
            .product_categories()
            .create(ProductCategoryCreate {
                name: "Pâtes pressées cuites".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let mut comte = ProductCreate::new("Comté 18 mois", 2490, 500);
        comte.category_id = Some(category.id);
        services.products().create(comte).await.unwrap();
        services
            .products()
            .create(ProductCreate::new("Morbier", 1890, 400))
            .await
            .unwrap();

        let listed = services
            .product_categories()
            .products(category.id, 10)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Comté 18 mois");

        assert!(matches!(
            services.product_categories().products(99, 10).await,
            Err(ServiceError::NotFound { entity: "ProductCategory", .. })
        ));
    }

    #[tokio::test]
    async fn test_low_stock() {
        let services = test_services().await;

        let mut scarce = ProductCreate::new("Mont d'Or", 1590, 450);
        scarce.stock_quantity = 2;
        services.products().create(scarce).await.unwrap();

        let mut plenty = ProductCreate::new("Comté 12 mois", 1990, 500);
        plenty.stock_quantity = 40;
        services.products().create(plenty).await.unwrap();

        let mut retired = ProductCreate::new("Bleu de Gex", 2100, 250);
        retired.stock_quantity = 4;
        retired.is_active = false;
        services.products().create(retired).await.unwrap();

        let low = services.products().low_stock(10).await.unwrap();
        let names: Vec<_> = low.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Mont d'Or", "Bleu de Gex"]);
        assert!(low.iter().all(|p| p.is_low_stock()));
    }
}
