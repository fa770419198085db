//! Manual stock entries and withdrawals
//!
//! Each call changes one material or product and appends the matching
//! kardex entry in the same store transaction.

use shared::{validate_quantity, Material, Product, StockChange};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::{DynStore, StockRequest};

/// Kardex note for `add` operations
pub const ENTRY_NOTE: &str = "Manual stock entry";

/// Kardex note for `remove` operations
pub const WITHDRAWAL_NOTE: &str = "Manual stock withdrawal";

/// Kardex note for a `stock` field sent in a partial update
pub const UPDATE_NOTE: &str = "Manual stock update";

/// Stock service
#[derive(Clone)]
pub struct StockService {
    store: DynStore,
}

impl StockService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn add_material(&self, id: Uuid, quantity: i32, user_id: Uuid) -> AppResult<Material> {
        let request = Self::request(StockChange::Add(quantity), user_id)?;
        let adjusted = self.store.adjust_material_stock(id, request).await?;

        tracing::info!(
            material_id = %id,
            quantity,
            stock = adjusted.record.stock,
            "Material stock added"
        );
        Ok(adjusted.record)
    }

    pub async fn remove_material(&self, id: Uuid, quantity: i32, user_id: Uuid) -> AppResult<Material> {
        let request = Self::request(StockChange::Remove(quantity), user_id)?;
        let adjusted = self.store.adjust_material_stock(id, request).await?;

        tracing::info!(
            material_id = %id,
            quantity,
            stock = adjusted.record.stock,
            "Material stock removed"
        );
        Ok(adjusted.record)
    }

    pub async fn add_product(&self, id: Uuid, quantity: i32, user_id: Uuid) -> AppResult<Product> {
        let request = Self::request(StockChange::Add(quantity), user_id)?;
        let adjusted = self.store.adjust_product_stock(id, request).await?;

        tracing::info!(
            product_id = %id,
            quantity,
            stock = adjusted.record.stock,
            "Product stock added"
        );
        Ok(adjusted.record)
    }

    pub async fn remove_product(&self, id: Uuid, quantity: i32, user_id: Uuid) -> AppResult<Product> {
        let request = Self::request(StockChange::Remove(quantity), user_id)?;
        let adjusted = self.store.adjust_product_stock(id, request).await?;

        tracing::info!(
            product_id = %id,
            quantity,
            stock = adjusted.record.stock,
            "Product stock removed"
        );
        Ok(adjusted.record)
    }

    fn request(change: StockChange, user_id: Uuid) -> AppResult<StockRequest> {
        if let StockChange::Add(quantity) | StockChange::Remove(quantity) = change {
            validate_quantity(quantity).map_err(|msg| AppError::validation("quantity", msg))?;
        }
        Ok(Self::stock_request(change, user_id))
    }

    /// Stock request for a partial update that carries a `stock` value
    pub fn update_request(stock: Option<i32>, user_id: Uuid) -> Option<StockRequest> {
        stock.map(|value| Self::stock_request(StockChange::Set(value), user_id))
    }

    fn stock_request(change: StockChange, user_id: Uuid) -> StockRequest {
        let note = match change {
            StockChange::Add(_) => ENTRY_NOTE,
            StockChange::Remove(_) => WITHDRAWAL_NOTE,
            StockChange::Set(_) => UPDATE_NOTE,
        };

        StockRequest {
            change,
            note: note.to_string(),
            user_id,
        }
    }
}
