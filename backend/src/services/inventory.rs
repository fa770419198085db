//! Low stock alerts

use shared::{Material, Product};

use crate::error::AppResult;
use crate::store::DynStore;

/// Inventory service for stock alerts
#[derive(Clone)]
pub struct InventoryService {
    store: DynStore,
}

impl InventoryService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    /// Materials whose stock is below their minimum
    pub async fn material_alerts(&self) -> AppResult<Vec<Material>> {
        self.store.low_stock_materials().await
    }

    /// Products whose stock is below their minimum
    pub async fn product_alerts(&self) -> AppResult<Vec<Product>> {
        self.store.low_stock_products().await
    }
}
