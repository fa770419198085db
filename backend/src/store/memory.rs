//! In-memory store
//!
//! Intended for tests and local demos. Every operation takes the single
//! write lock, so a stock change and its kardex entry are always applied
//! together; failures are detected before anything is mutated.

use async_trait::async_trait;
use chrono::Utc;
use shared::{
    plan_movement, KardexEntry, KardexFilter, KardexView, Material, MaterialUpdate, Movement,
    NewKardexEntry, NewMaterial, NewProduct, NewPurchaseOrder, NewSupplier, Product, ProductUpdate,
    PurchaseOrder, PurchaseOrderView, PurchaseStatus, StockChange, StockItem, StockLevel, Supplier,
    SupplierUpdate, SupplierView, User, UserAccount,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Adjusted, StockRequest, Store};
use crate::error::{AppError, AppResult};

#[derive(Debug, Default)]
struct MemoryState {
    users: Vec<UserAccount>,
    materials: Vec<Material>,
    products: Vec<Product>,
    suppliers: Vec<Supplier>,
    orders: Vec<PurchaseOrder>,
    kardex: Vec<KardexEntry>,
}

impl MemoryState {
    fn material(&self, id: Uuid) -> AppResult<&Material> {
        self.materials
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| AppError::NotFound("Material".to_string()))
    }

    fn material_mut(&mut self, id: Uuid) -> AppResult<&mut Material> {
        self.materials
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| AppError::NotFound("Material".to_string()))
    }

    fn product(&self, id: Uuid) -> AppResult<&Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    fn product_mut(&mut self, id: Uuid) -> AppResult<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    fn current_stock(&self, item: StockItem) -> AppResult<i32> {
        match item {
            StockItem::Material(id) => self.material(id).map(|m| m.stock),
            StockItem::Product(id) => self.product(id).map(|p| p.stock),
        }
    }

    /// Plan a change without mutating anything
    fn plan(&self, item: StockItem, request: Option<&StockRequest>) -> AppResult<Option<Movement>> {
        match request {
            Some(request) => Ok(plan_movement(self.current_stock(item)?, request.change)?),
            None => Ok(None),
        }
    }

    /// Write a planned movement: new stock plus its kardex entry
    fn commit(
        &mut self,
        item: StockItem,
        movement: Option<Movement>,
        request: Option<&StockRequest>,
    ) -> AppResult<Option<KardexEntry>> {
        let (Some(movement), Some(request)) = (movement, request) else {
            return Ok(None);
        };

        match item {
            StockItem::Material(id) => self.material_mut(id)?.stock = movement.stock_after,
            StockItem::Product(id) => self.product_mut(id)?.stock = movement.stock_after,
        }

        let entry = self.push_kardex(&NewKardexEntry {
            item,
            movement,
            note: Some(request.note.clone()),
            user_id: request.user_id,
        });
        Ok(Some(entry))
    }

    fn push_kardex(&mut self, entry: &NewKardexEntry) -> KardexEntry {
        let entry = KardexEntry {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            movement_type: entry.movement.movement_type,
            quantity: entry.movement.quantity,
            stock_before: entry.movement.stock_before,
            stock_after: entry.movement.stock_after,
            note: entry.note.clone(),
            item: entry.item,
            user_id: entry.user_id,
        };
        self.kardex.push(entry.clone());
        entry
    }

    fn supplier_view(&self, supplier: &Supplier) -> SupplierView {
        SupplierView {
            supplier: supplier.clone(),
            material_name: self.material(supplier.material_id).ok().map(|m| m.name.clone()),
        }
    }

    fn order_view(&self, order: &PurchaseOrder) -> PurchaseOrderView {
        PurchaseOrderView {
            order: order.clone(),
            supplier_name: self
                .suppliers
                .iter()
                .find(|s| s.id == order.supplier_id)
                .map(|s| s.name.clone()),
        }
    }

    fn kardex_view(&self, entry: &KardexEntry) -> KardexView {
        KardexView {
            entry: entry.clone(),
            username: self
                .users
                .iter()
                .find(|u| u.id == entry.user_id)
                .map(|u| u.username.clone()),
            material_name: entry
                .item
                .material_id()
                .and_then(|id| self.material(id).ok())
                .map(|m| m.name.clone()),
            product_name: entry
                .item
                .product_id()
                .and_then(|id| self.product(id).ok())
                .map(|p| p.name.clone()),
        }
    }
}

fn sorted_by_name<T: Clone>(items: &[T], name: impl Fn(&T) -> &str) -> Vec<T> {
    let mut items = items.to_vec();
    items.sort_by(|a, b| name(a).cmp(name(b)));
    items
}

/// Store that keeps everything in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn insert_user(&self, username: &str, password_hash: &str) -> AppResult<User> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.username == username) {
            return Err(AppError::DuplicateUser(username.to_string()));
        }

        let account = UserAccount {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        let user = account.user();
        state.users.push(account);
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<UserAccount>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn list_materials(&self) -> AppResult<Vec<Material>> {
        let state = self.state.read().await;
        Ok(sorted_by_name(&state.materials, |m| m.name.as_str()))
    }

    async fn get_material(&self, id: Uuid) -> AppResult<Option<Material>> {
        let state = self.state.read().await;
        Ok(state.material(id).ok().cloned())
    }

    async fn insert_material(&self, input: &NewMaterial) -> AppResult<Material> {
        let material = Material {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            material_type: input.material_type.clone(),
            color: input.color.clone(),
            stock: input.stock,
            min_stock: input.min_stock,
        };
        self.state.write().await.materials.push(material.clone());
        Ok(material)
    }

    async fn update_material(
        &self,
        id: Uuid,
        update: &MaterialUpdate,
        stock: Option<StockRequest>,
    ) -> AppResult<Adjusted<Material>> {
        let mut state = self.state.write().await;
        let item = StockItem::Material(id);
        let movement = state.plan(item, stock.as_ref())?;

        update.apply_fields(state.material_mut(id)?);
        let entry = state.commit(item, movement, stock.as_ref())?;

        Ok(Adjusted {
            record: state.material(id)?.clone(),
            entry,
        })
    }

    async fn adjust_material_stock(&self, id: Uuid, request: StockRequest) -> AppResult<Adjusted<Material>> {
        let mut state = self.state.write().await;
        let item = StockItem::Material(id);
        let movement = state.plan(item, Some(&request))?;
        let entry = state.commit(item, movement, Some(&request))?;

        Ok(Adjusted {
            record: state.material(id)?.clone(),
            entry,
        })
    }

    async fn low_stock_materials(&self) -> AppResult<Vec<Material>> {
        let state = self.state.read().await;
        let low: Vec<Material> = state.materials.iter().filter(|m| m.is_low_stock()).cloned().collect();
        Ok(sorted_by_name(&low, |m| m.name.as_str()))
    }

    async fn list_products(&self) -> AppResult<Vec<Product>> {
        let state = self.state.read().await;
        Ok(sorted_by_name(&state.products, |p| p.name.as_str()))
    }

    async fn get_product(&self, id: Uuid) -> AppResult<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.product(id).ok().cloned())
    }

    async fn insert_product(&self, input: &NewProduct) -> AppResult<Product> {
        let product = Product {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            product_type: input.product_type.clone(),
            color: input.color.clone(),
            stock: input.stock,
            min_stock: input.min_stock,
            sale_price: input.sale_price,
        };
        self.state.write().await.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: Uuid,
        update: &ProductUpdate,
        stock: Option<StockRequest>,
    ) -> AppResult<Adjusted<Product>> {
        let mut state = self.state.write().await;
        let item = StockItem::Product(id);
        let movement = state.plan(item, stock.as_ref())?;

        update.apply_fields(state.product_mut(id)?);
        let entry = state.commit(item, movement, stock.as_ref())?;

        Ok(Adjusted {
            record: state.product(id)?.clone(),
            entry,
        })
    }

    async fn adjust_product_stock(&self, id: Uuid, request: StockRequest) -> AppResult<Adjusted<Product>> {
        let mut state = self.state.write().await;
        let item = StockItem::Product(id);
        let movement = state.plan(item, Some(&request))?;
        let entry = state.commit(item, movement, Some(&request))?;

        Ok(Adjusted {
            record: state.product(id)?.clone(),
            entry,
        })
    }

    async fn low_stock_products(&self) -> AppResult<Vec<Product>> {
        let state = self.state.read().await;
        let low: Vec<Product> = state.products.iter().filter(|p| p.is_low_stock()).cloned().collect();
        Ok(sorted_by_name(&low, |p| p.name.as_str()))
    }

    async fn list_suppliers(&self) -> AppResult<Vec<SupplierView>> {
        let state = self.state.read().await;
        Ok(sorted_by_name(&state.suppliers, |s| s.name.as_str())
            .iter()
            .map(|s| state.supplier_view(s))
            .collect())
    }

    async fn get_supplier(&self, id: Uuid) -> AppResult<Option<SupplierView>> {
        let state = self.state.read().await;
        Ok(state.suppliers.iter().find(|s| s.id == id).map(|s| state.supplier_view(s)))
    }

    async fn list_suppliers_by_material(&self, material_id: Uuid) -> AppResult<Vec<SupplierView>> {
        let state = self.state.read().await;
        Ok(sorted_by_name(&state.suppliers, |s| s.name.as_str())
            .iter()
            .filter(|s| s.supplies(material_id))
            .map(|s| state.supplier_view(s))
            .collect())
    }

    async fn supplier_name_taken(&self, name: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .suppliers
            .iter()
            .any(|s| s.name == name && Some(s.id) != exclude))
    }

    async fn insert_supplier(&self, input: &NewSupplier) -> AppResult<SupplierView> {
        let mut state = self.state.write().await;
        if state.suppliers.iter().any(|s| s.name == input.name) {
            return Err(AppError::DuplicateName(input.name.clone()));
        }

        let supplier = Supplier {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            contact_person: input.contact_person.clone(),
            phone: input.phone.clone(),
            email: input.email.clone(),
            address: input.address.clone(),
            material_id: input.material_id,
        };
        state.suppliers.push(supplier.clone());
        Ok(state.supplier_view(&supplier))
    }

    async fn update_supplier(&self, id: Uuid, update: &SupplierUpdate) -> AppResult<Option<SupplierView>> {
        let mut state = self.state.write().await;
        let Some(supplier) = state.suppliers.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };

        update.apply(supplier);
        let supplier = supplier.clone();
        Ok(Some(state.supplier_view(&supplier)))
    }

    async fn delete_supplier(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.suppliers.len();
        state.suppliers.retain(|s| s.id != id);
        Ok(state.suppliers.len() != before)
    }

    async fn supplier_has_orders(&self, id: Uuid) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state.orders.iter().any(|o| o.supplier_id == id))
    }

    async fn list_purchase_orders(&self, user_id: Uuid) -> AppResult<Vec<PurchaseOrderView>> {
        let state = self.state.read().await;
        Ok(state
            .orders
            .iter()
            .rev()
            .filter(|o| o.is_owned_by(user_id))
            .map(|o| state.order_view(o))
            .collect())
    }

    async fn insert_purchase_order(
        &self,
        input: &NewPurchaseOrder,
        supplier: &Supplier,
        user_id: Uuid,
    ) -> AppResult<PurchaseOrderView> {
        let order = PurchaseOrder {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            quantity: input.quantity,
            status: PurchaseStatus::Pending,
            supplier_id: supplier.id,
            material_id: input.material_id,
            user_id,
        };
        self.state.write().await.orders.push(order.clone());

        Ok(PurchaseOrderView {
            order,
            supplier_name: Some(supplier.name.clone()),
        })
    }

    async fn complete_purchase_order(&self, order_id: Uuid, user_id: Uuid) -> AppResult<Adjusted<PurchaseOrderView>> {
        let mut state = self.state.write().await;

        let mut order = state
            .orders
            .iter()
            .find(|o| o.id == order_id && o.is_owned_by(user_id))
            .cloned()
            .ok_or_else(|| AppError::NotFound("Purchase order".to_string()))?;
        order.mark_completed()?;

        let request = StockRequest {
            change: StockChange::Add(order.quantity),
            note: order.completion_note(),
            user_id,
        };
        let item = StockItem::Material(order.material_id);
        let movement = state.plan(item, Some(&request))?;
        let entry = state.commit(item, movement, Some(&request))?;

        if let Some(stored) = state.orders.iter_mut().find(|o| o.id == order_id) {
            *stored = order.clone();
        }

        Ok(Adjusted {
            record: state.order_view(&order),
            entry,
        })
    }

    async fn insert_kardex(&self, entry: &NewKardexEntry) -> AppResult<KardexEntry> {
        let mut state = self.state.write().await;
        Ok(state.push_kardex(entry))
    }

    async fn list_kardex(&self, filter: &KardexFilter) -> AppResult<Vec<KardexView>> {
        let state = self.state.read().await;
        let limit = usize::try_from(filter.limit).unwrap_or(0);

        Ok(state
            .kardex
            .iter()
            .rev()
            .filter(|e| filter.matches(e))
            .take(limit)
            .map(|e| state.kardex_view(e))
            .collect())
    }

    async fn stock_item_exists(&self, item: StockItem) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state.current_stock(item).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glass(stock: i32) -> NewMaterial {
        NewMaterial {
            name: "Float glass".to_string(),
            material_type: "glass".to_string(),
            color: None,
            stock,
            min_stock: 0,
        }
    }

    #[tokio::test]
    async fn test_failed_update_leaves_fields_untouched() {
        let store = MemoryStore::new();
        let material = store.insert_material(&glass(5)).await.unwrap();

        let update = MaterialUpdate {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let request = StockRequest {
            change: StockChange::Set(-3),
            note: "Manual stock update".to_string(),
            user_id: Uuid::new_v4(),
        };

        assert!(store.update_material(material.id, &update, Some(request)).await.is_err());

        let stored = store.get_material(material.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Float glass");
        assert_eq!(stored.stock, 5);
    }

    #[tokio::test]
    async fn test_kardex_listing_is_newest_first() {
        let store = MemoryStore::new();
        let material = store.insert_material(&glass(0)).await.unwrap();
        let user_id = Uuid::new_v4();

        for quantity in 1..=3 {
            store
                .adjust_material_stock(
                    material.id,
                    StockRequest {
                        change: StockChange::Add(quantity),
                        note: "Manual stock entry".to_string(),
                        user_id,
                    },
                )
                .await
                .unwrap();
        }

        let filter = KardexFilter {
            user_id,
            material_id: None,
            product_id: None,
            limit: 2,
        };
        let entries = store.list_kardex(&filter).await.unwrap();
        let quantities: Vec<i32> = entries.iter().map(|v| v.entry.quantity).collect();
        assert_eq!(quantities, vec![3, 2]);
        assert_eq!(entries[0].material_name.as_deref(), Some("Float glass"));
    }
}
