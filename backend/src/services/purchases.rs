//! Purchase order workflow
//!
//! Orders move from `pending` to `completed` exactly once. Completing an
//! order receives its quantity into the material's stock.

use shared::{NewPurchaseOrder, PurchaseOrderView};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::store::DynStore;

/// Purchase order service
#[derive(Clone)]
pub struct PurchaseService {
    store: DynStore,
}

impl PurchaseService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    /// Orders created by the user, newest first
    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<PurchaseOrderView>> {
        self.store.list_purchase_orders(user_id).await
    }

    pub async fn create(&self, user_id: Uuid, input: NewPurchaseOrder) -> AppResult<PurchaseOrderView> {
        input.validate()?;

        let material = self
            .store
            .get_material(input.material_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Material".to_string()))?;

        let supplier = self
            .store
            .get_supplier(input.supplier_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?
            .supplier;

        if !supplier.supplies(material.id) {
            return Err(AppError::AssociationMismatch {
                supplier: supplier.name,
                material: material.name,
            });
        }

        let order = self.store.insert_purchase_order(&input, &supplier, user_id).await?;
        tracing::info!(
            order_id = %order.order.id,
            supplier_id = %supplier.id,
            material_id = %material.id,
            quantity = input.quantity,
            "Purchase order created"
        );

        Ok(order)
    }

    /// Receive the goods of a pending order
    pub async fn complete(&self, user_id: Uuid, order_id: Uuid) -> AppResult<PurchaseOrderView> {
        let adjusted = self.store.complete_purchase_order(order_id, user_id).await?;

        tracing::info!(
            order_id = %order_id,
            material_id = %adjusted.record.order.material_id,
            quantity = adjusted.record.order.quantity,
            stock = adjusted.entry.as_ref().map(|e| e.stock_after),
            "Purchase order completed"
        );

        Ok(adjusted.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Store};
    use shared::{Material, NewMaterial, NewSupplier, PurchaseStatus, Supplier};
    use std::sync::Arc;

    struct Fixture {
        purchases: PurchaseService,
        store: DynStore,
        material: Material,
        supplier: Supplier,
    }

    async fn material(store: &DynStore, name: &str) -> Material {
        store
            .insert_material(&NewMaterial {
                name: name.to_string(),
                material_type: "glass".to_string(),
                color: None,
                stock: 5,
                min_stock: 0,
            })
            .await
            .unwrap()
    }

    async fn setup() -> Fixture {
        let store: DynStore = Arc::new(MemoryStore::new());
        let material = material(&store, "Float glass 4mm").await;
        let supplier = store
            .insert_supplier(&NewSupplier {
                name: "Vidriera Central".to_string(),
                contact_person: None,
                phone: None,
                email: None,
                address: None,
                material_id: material.id,
            })
            .await
            .unwrap()
            .supplier;

        Fixture {
            purchases: PurchaseService::new(store.clone()),
            store,
            material,
            supplier,
        }
    }

    fn order(f: &Fixture, quantity: i32) -> NewPurchaseOrder {
        NewPurchaseOrder {
            supplier_id: f.supplier.id,
            material_id: f.material.id,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_complete_adds_stock_once() {
        let f = setup().await;
        let user_id = Uuid::new_v4();

        let created = f.purchases.create(user_id, order(&f, 20)).await.unwrap();
        assert_eq!(created.order.status, PurchaseStatus::Pending);
        assert_eq!(created.supplier_name.as_deref(), Some("Vidriera Central"));

        let completed = f.purchases.complete(user_id, created.order.id).await.unwrap();
        assert_eq!(completed.order.status, PurchaseStatus::Completed);

        let stored = f.store.get_material(f.material.id).await.unwrap().unwrap();
        assert_eq!(stored.stock, 25);

        assert!(matches!(
            f.purchases.complete(user_id, created.order.id).await,
            Err(AppError::AlreadyCompleted(id)) if id == created.order.id
        ));
        let stored = f.store.get_material(f.material.id).await.unwrap().unwrap();
        assert_eq!(stored.stock, 25);
    }

    #[tokio::test]
    async fn test_mismatched_supplier() {
        let f = setup().await;
        let other = material(&f.store, "Mirror 3mm").await;

        let input = NewPurchaseOrder {
            supplier_id: f.supplier.id,
            material_id: other.id,
            quantity: 3,
        };
        assert!(matches!(
            f.purchases.create(Uuid::new_v4(), input).await,
            Err(AppError::AssociationMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_zero_quantity() {
        let f = setup().await;
        assert!(matches!(
            f.purchases.create(Uuid::new_v4(), order(&f, 0)).await,
            Err(AppError::Validation { field, .. }) if field == "quantity"
        ));
    }

    #[tokio::test]
    async fn test_other_users_order_is_not_found() {
        let f = setup().await;
        let owner = Uuid::new_v4();
        let created = f.purchases.create(owner, order(&f, 2)).await.unwrap();

        assert!(matches!(
            f.purchases.complete(Uuid::new_v4(), created.order.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(f.purchases.list(Uuid::new_v4()).await.unwrap().is_empty());
        assert_eq!(f.purchases.list(owner).await.unwrap().len(), 1);
    }
}
