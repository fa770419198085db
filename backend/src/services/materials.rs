//! Material catalogue service

use shared::{Material, MaterialUpdate, NewMaterial, SupplierView};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::stock::StockService;
use crate::store::DynStore;

/// Material service
#[derive(Clone)]
pub struct MaterialService {
    store: DynStore,
}

impl MaterialService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    /// List all materials, ordered by name
    pub async fn list(&self) -> AppResult<Vec<Material>> {
        self.store.list_materials().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Material> {
        self.store
            .get_material(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Material".to_string()))
    }

    /// Create a material. An initial stock is an opening balance and does
    /// not produce a kardex entry.
    pub async fn create(&self, input: NewMaterial) -> AppResult<Material> {
        input.validate()?;

        let material = self.store.insert_material(&input).await?;
        tracing::info!(material_id = %material.id, name = %material.name, "Material created");

        Ok(material)
    }

    /// Apply a partial update; a `stock` value is recorded as a movement
    pub async fn update(&self, id: Uuid, update: MaterialUpdate, user_id: Uuid) -> AppResult<Material> {
        update.validate()?;

        let request = StockService::update_request(update.stock, user_id);
        let adjusted = self.store.update_material(id, &update, request).await?;

        if let Some(entry) = &adjusted.entry {
            tracing::info!(
                material_id = %id,
                movement = %entry.movement_type,
                quantity = entry.quantity,
                stock = entry.stock_after,
                "Material stock set"
            );
        }

        Ok(adjusted.record)
    }

    /// Suppliers that provide the material
    pub async fn suppliers(&self, id: Uuid) -> AppResult<Vec<SupplierView>> {
        self.get(id).await?;
        self.store.list_suppliers_by_material(id).await
    }
}
