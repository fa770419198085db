//! Finished product service

use shared::{NewProduct, Product, ProductUpdate};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::stock::StockService;
use crate::store::DynStore;

#[derive(Clone)]
pub struct ProductService {
    store: DynStore,
}

impl ProductService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Product>> {
        self.store.list_products().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Product> {
        self.store
            .get_product(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    pub async fn create(&self, input: NewProduct) -> AppResult<Product> {
        input.validate()?;

        let product = self.store.insert_product(&input).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "Product created");

        Ok(product)
    }

    pub async fn update(&self, id: Uuid, update: ProductUpdate, user_id: Uuid) -> AppResult<Product> {
        update.validate()?;

        let request = StockService::update_request(update.stock, user_id);
        let adjusted = self.store.update_product(id, &update, request).await?;

        if let Some(entry) = &adjusted.entry {
            tracing::info!(
                product_id = %id,
                movement = %entry.movement_type,
                quantity = entry.quantity,
                stock = entry.stock_after,
                "Product stock set"
            );
        }

        Ok(adjusted.record)
    }
}
