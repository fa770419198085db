//! Persistence boundary
//!
//! Services talk to a [`Store`]; the PostgreSQL store is used in production
//! and the in-memory store backs tests and local demos. Both implementations
//! run every stock change through [`shared::plan_movement`] and persist the
//! new stock together with its kardex entry as one atomic unit.

use async_trait::async_trait;
use shared::{
    KardexEntry, KardexFilter, KardexView, Material, MaterialUpdate, NewKardexEntry, NewMaterial,
    NewProduct, NewPurchaseOrder, NewSupplier, Product, ProductUpdate, PurchaseOrderView,
    StockChange, StockItem, Supplier, SupplierUpdate, SupplierView, User, UserAccount,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppResult;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Shared handle to the configured store
pub type DynStore = Arc<dyn Store>;

/// A record together with the kardex entry its change produced, if any
#[derive(Debug, Clone)]
pub struct Adjusted<T> {
    pub record: T,
    pub entry: Option<KardexEntry>,
}

/// Describes a stock change to apply atomically with its ledger entry
#[derive(Debug, Clone)]
pub struct StockRequest {
    pub change: StockChange,
    pub note: String,
    pub user_id: Uuid,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Check that the backing storage is reachable
    async fn ping(&self) -> AppResult<()>;

    // Users

    /// Insert a user. Fails with `DuplicateUser` if the username is taken.
    async fn insert_user(&self, username: &str, password_hash: &str) -> AppResult<User>;

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<UserAccount>>;

    // Materials

    async fn list_materials(&self) -> AppResult<Vec<Material>>;

    async fn get_material(&self, id: Uuid) -> AppResult<Option<Material>>;

    async fn insert_material(&self, input: &NewMaterial) -> AppResult<Material>;

    /// Apply a partial update. A `stock` field becomes a `Set` stock change
    /// and is recorded in the kardex in the same transaction.
    async fn update_material(
        &self,
        id: Uuid,
        update: &MaterialUpdate,
        stock: Option<StockRequest>,
    ) -> AppResult<Adjusted<Material>>;

    async fn adjust_material_stock(&self, id: Uuid, request: StockRequest) -> AppResult<Adjusted<Material>>;

    async fn low_stock_materials(&self) -> AppResult<Vec<Material>>;

    // Products

    async fn list_products(&self) -> AppResult<Vec<Product>>;

    async fn get_product(&self, id: Uuid) -> AppResult<Option<Product>>;

    async fn insert_product(&self, input: &NewProduct) -> AppResult<Product>;

    async fn update_product(
        &self,
        id: Uuid,
        update: &ProductUpdate,
        stock: Option<StockRequest>,
    ) -> AppResult<Adjusted<Product>>;

    async fn adjust_product_stock(&self, id: Uuid, request: StockRequest) -> AppResult<Adjusted<Product>>;

    async fn low_stock_products(&self) -> AppResult<Vec<Product>>;

    // Suppliers

    async fn list_suppliers(&self) -> AppResult<Vec<SupplierView>>;

    async fn get_supplier(&self, id: Uuid) -> AppResult<Option<SupplierView>>;

    async fn list_suppliers_by_material(&self, material_id: Uuid) -> AppResult<Vec<SupplierView>>;

    /// Whether a supplier other than `exclude` already uses `name`
    async fn supplier_name_taken(&self, name: &str, exclude: Option<Uuid>) -> AppResult<bool>;

    async fn insert_supplier(&self, input: &NewSupplier) -> AppResult<SupplierView>;

    async fn update_supplier(&self, id: Uuid, update: &SupplierUpdate) -> AppResult<Option<SupplierView>>;

    /// Hard delete; returns false when the supplier did not exist
    async fn delete_supplier(&self, id: Uuid) -> AppResult<bool>;

    async fn supplier_has_orders(&self, id: Uuid) -> AppResult<bool>;

    // Purchase orders

    async fn list_purchase_orders(&self, user_id: Uuid) -> AppResult<Vec<PurchaseOrderView>>;

    async fn insert_purchase_order(&self, input: &NewPurchaseOrder, supplier: &Supplier, user_id: Uuid)
        -> AppResult<PurchaseOrderView>;

    /// Complete a pending order owned by `user_id`: add its quantity to the
    /// material, record the kardex entry and flip the status, atomically.
    async fn complete_purchase_order(&self, order_id: Uuid, user_id: Uuid) -> AppResult<Adjusted<PurchaseOrderView>>;

    // Kardex

    /// Append a kardex entry without touching any stock
    async fn insert_kardex(&self, entry: &NewKardexEntry) -> AppResult<KardexEntry>;

    async fn list_kardex(&self, filter: &KardexFilter) -> AppResult<Vec<KardexView>>;

    /// Whether the referenced material or product exists
    async fn stock_item_exists(&self, item: StockItem) -> AppResult<bool>;
}
