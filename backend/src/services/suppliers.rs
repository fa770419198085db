//! Supplier management service

use shared::{NewSupplier, SupplierUpdate, SupplierView};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::store::DynStore;

/// Supplier service
#[derive(Clone)]
pub struct SupplierService {
    store: DynStore,
}

impl SupplierService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<SupplierView>> {
        self.store.list_suppliers().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<SupplierView> {
        self.store
            .get_supplier(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Supplier".to_string()))
    }

    /// Suppliers of a material. An existing material without suppliers
    /// yields an empty list.
    pub async fn list_by_material(&self, material_id: Uuid) -> AppResult<Vec<SupplierView>> {
        self.ensure_material(material_id).await?;
        self.store.list_suppliers_by_material(material_id).await
    }

    pub async fn create(&self, input: NewSupplier) -> AppResult<SupplierView> {
        input.validate()?;

        if self.store.supplier_name_taken(&input.name, None).await? {
            return Err(AppError::DuplicateName(input.name));
        }
        self.ensure_material(input.material_id).await?;

        let supplier = self.store.insert_supplier(&input).await?;
        tracing::info!(
            supplier_id = %supplier.supplier.id,
            material_id = %supplier.supplier.material_id,
            "Supplier created"
        );

        Ok(supplier)
    }

    pub async fn update(&self, id: Uuid, update: SupplierUpdate) -> AppResult<SupplierView> {
        update.validate()?;
        let current = self.get(id).await?;

        if let Some(name) = &update.name {
            if self.store.supplier_name_taken(name, Some(id)).await? {
                return Err(AppError::DuplicateName(name.clone()));
            }
        }
        if let Some(material_id) = update.material_id {
            self.ensure_material(material_id).await?;

            // Existing orders pin the supplier to the material they were placed for
            if material_id != current.supplier.material_id && self.store.supplier_has_orders(id).await? {
                return Err(AppError::Conflict {
                    resource: "supplier".to_string(),
                    message: "Supplier has purchase orders and cannot change material".to_string(),
                });
            }
        }

        self.store
            .update_supplier(id, &update)
            .await?
            .ok_or_else(|| AppError::NotFound("Supplier".to_string()))
    }

    /// Delete a supplier that no purchase order refers to
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.get(id).await?;

        if self.store.supplier_has_orders(id).await? {
            return Err(AppError::Conflict {
                resource: "supplier".to_string(),
                message: "Supplier has purchase orders and cannot be deleted".to_string(),
            });
        }

        if !self.store.delete_supplier(id).await? {
            return Err(AppError::NotFound("Supplier".to_string()));
        }
        tracing::info!(supplier_id = %id, "Supplier deleted");

        Ok(())
    }

    async fn ensure_material(&self, material_id: Uuid) -> AppResult<()> {
        match self.store.get_material(material_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Material".to_string())),
        }
    }
}
