//! PostgreSQL store
//!
//! Stock changes lock the affected row with `SELECT ... FOR UPDATE`, plan the
//! movement and write the new stock plus its kardex row inside one
//! transaction. Concurrent changes to the same item are serialized by the
//! row lock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::{
    plan_movement, KardexEntry, KardexFilter, KardexView, Material, MaterialUpdate, Movement,
    MovementType, NewKardexEntry, NewMaterial, NewProduct, NewPurchaseOrder, NewSupplier, Product,
    ProductUpdate, PurchaseOrder, PurchaseOrderView, PurchaseStatus, StockChange, StockItem, Supplier,
    SupplierUpdate, SupplierView, User, UserAccount,
};
use sqlx::{FromRow, PgExecutor, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{Adjusted, StockRequest, Store};
use crate::error::{AppError, AppResult};

/// Store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
}

impl From<UserRow> for UserAccount {
    fn from(row: UserRow) -> Self {
        UserAccount {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
        }
    }
}

#[derive(Debug, FromRow)]
struct MaterialRow {
    id: Uuid,
    name: String,
    material_type: String,
    color: Option<String>,
    stock: i32,
    min_stock: i32,
}

impl From<MaterialRow> for Material {
    fn from(row: MaterialRow) -> Self {
        Material {
            id: row.id,
            name: row.name,
            material_type: row.material_type,
            color: row.color,
            stock: row.stock,
            min_stock: row.min_stock,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    product_type: String,
    color: Option<String>,
    stock: i32,
    min_stock: i32,
    sale_price: Decimal,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            product_type: row.product_type,
            color: row.color,
            stock: row.stock,
            min_stock: row.min_stock,
            sale_price: row.sale_price,
        }
    }
}

/// Supplier joined with its material's name
#[derive(Debug, FromRow)]
struct SupplierRow {
    id: Uuid,
    name: String,
    contact_person: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    material_id: Uuid,
    material_name: Option<String>,
}

impl From<SupplierRow> for SupplierView {
    fn from(row: SupplierRow) -> Self {
        SupplierView {
            supplier: Supplier {
                id: row.id,
                name: row.name,
                contact_person: row.contact_person,
                phone: row.phone,
                email: row.email,
                address: row.address,
                material_id: row.material_id,
            },
            material_name: row.material_name,
        }
    }
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    quantity: i32,
    status: String,
    supplier_id: Uuid,
    material_id: Uuid,
    user_id: Uuid,
}

impl TryFrom<OrderRow> for PurchaseOrder {
    type Error = AppError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(PurchaseOrder {
            id: row.id,
            created_at: row.created_at,
            quantity: row.quantity,
            status: row.status.parse::<PurchaseStatus>().map_err(AppError::Internal)?,
            supplier_id: row.supplier_id,
            material_id: row.material_id,
            user_id: row.user_id,
        })
    }
}

#[derive(Debug, FromRow)]
struct OrderViewRow {
    #[sqlx(flatten)]
    order: OrderRow,
    supplier_name: Option<String>,
}

impl TryFrom<OrderViewRow> for PurchaseOrderView {
    type Error = AppError;

    fn try_from(row: OrderViewRow) -> Result<Self, Self::Error> {
        Ok(PurchaseOrderView {
            order: row.order.try_into()?,
            supplier_name: row.supplier_name,
        })
    }
}

#[derive(Debug, FromRow)]
struct KardexRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    movement_type: String,
    quantity: i32,
    stock_before: i32,
    stock_after: i32,
    note: Option<String>,
    material_id: Option<Uuid>,
    product_id: Option<Uuid>,
    user_id: Uuid,
}

impl TryFrom<KardexRow> for KardexEntry {
    type Error = AppError;

    fn try_from(row: KardexRow) -> Result<Self, Self::Error> {
        Ok(KardexEntry {
            id: row.id,
            created_at: row.created_at,
            movement_type: row.movement_type.parse::<MovementType>().map_err(AppError::Internal)?,
            quantity: row.quantity,
            stock_before: row.stock_before,
            stock_after: row.stock_after,
            note: row.note,
            item: StockItem::from_refs(row.material_id, row.product_id)
                .map_err(|e| AppError::Internal(e.to_string()))?,
            user_id: row.user_id,
        })
    }
}

#[derive(Debug, FromRow)]
struct KardexViewRow {
    #[sqlx(flatten)]
    entry: KardexRow,
    username: Option<String>,
    material_name: Option<String>,
    product_name: Option<String>,
}

impl TryFrom<KardexViewRow> for KardexView {
    type Error = AppError;

    fn try_from(row: KardexViewRow) -> Result<Self, Self::Error> {
        Ok(KardexView {
            entry: row.entry.try_into()?,
            username: row.username,
            material_name: row.material_name,
            product_name: row.product_name,
        })
    }
}

const MATERIAL_COLUMNS: &str = "id, name, material_type, color, stock, min_stock";
const PRODUCT_COLUMNS: &str = "id, name, product_type, color, stock, min_stock, sale_price";
const KARDEX_COLUMNS: &str =
    "id, created_at, movement_type, quantity, stock_before, stock_after, note, material_id, product_id, user_id";

const SUPPLIER_SELECT: &str = r#"
    SELECT s.id, s.name, s.contact_person, s.phone, s.email, s.address, s.material_id,
           m.name AS material_name
    FROM suppliers s
    LEFT JOIN materials m ON m.id = s.material_id
"#;

const ORDER_SELECT: &str = r#"
    SELECT o.id, o.created_at, o.quantity, o.status, o.supplier_id, o.material_id, o.user_id,
           s.name AS supplier_name
    FROM purchase_orders o
    LEFT JOIN suppliers s ON s.id = o.supplier_id
"#;

fn table_for(item: StockItem) -> &'static str {
    match item {
        StockItem::Material(_) => "materials",
        StockItem::Product(_) => "products",
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map_or(false, |db_err| db_err.is_unique_violation())
}

async fn insert_kardex_row<'e, E: PgExecutor<'e>>(executor: E, entry: &NewKardexEntry) -> AppResult<KardexEntry> {
    let row = sqlx::query_as::<_, KardexRow>(&format!(
        r#"
        INSERT INTO kardex (
            movement_type, quantity, stock_before, stock_after, note, material_id, product_id, user_id
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {KARDEX_COLUMNS}
        "#
    ))
    .bind(entry.movement.movement_type.as_str())
    .bind(entry.movement.quantity)
    .bind(entry.movement.stock_before)
    .bind(entry.movement.stock_after)
    .bind(&entry.note)
    .bind(entry.item.material_id())
    .bind(entry.item.product_id())
    .bind(entry.user_id)
    .fetch_one(executor)
    .await?;

    row.try_into()
}

/// Record a planned movement against a row that is already locked
async fn record_movement(
    tx: &mut Transaction<'_, Postgres>,
    item: StockItem,
    movement: Option<Movement>,
    request: &StockRequest,
) -> AppResult<Option<KardexEntry>> {
    let Some(movement) = movement else {
        return Ok(None);
    };

    sqlx::query(&format!("UPDATE {} SET stock = $2 WHERE id = $1", table_for(item)))
        .bind(item.id())
        .bind(movement.stock_after)
        .execute(&mut **tx)
        .await?;

    let entry = insert_kardex_row(
        &mut **tx,
        &NewKardexEntry {
            item,
            movement,
            note: Some(request.note.clone()),
            user_id: request.user_id,
        },
    )
    .await?;

    Ok(Some(entry))
}

/// Lock an item's row and apply a stock change to it
async fn apply_stock_change(
    tx: &mut Transaction<'_, Postgres>,
    item: StockItem,
    request: &StockRequest,
) -> AppResult<Option<KardexEntry>> {
    let stock = sqlx::query_scalar::<_, i32>(&format!(
        "SELECT stock FROM {} WHERE id = $1 FOR UPDATE",
        table_for(item)
    ))
    .bind(item.id())
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| AppError::NotFound(item.resource().to_string()))?;

    let movement = plan_movement(stock, request.change)?;
    record_movement(tx, item, movement, request).await
}

impl PgStore {
    async fn fetch_material(&self, id: Uuid) -> AppResult<Material> {
        self.get_material(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Material".to_string()))
    }

    async fn fetch_product(&self, id: Uuid) -> AppResult<Product> {
        self.get_product(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn insert_user(&self, username: &str, password_hash: &str) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateUser(username.to_string())
            } else {
                AppError::DatabaseError(e)
            }
        })?;

        Ok(UserAccount::from(row).user())
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(UserAccount::from))
    }

    async fn list_materials(&self) -> AppResult<Vec<Material>> {
        let rows = sqlx::query_as::<_, MaterialRow>(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials ORDER BY name"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Material::from).collect())
    }

    async fn get_material(&self, id: Uuid) -> AppResult<Option<Material>> {
        let row = sqlx::query_as::<_, MaterialRow>(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Material::from))
    }

    async fn insert_material(&self, input: &NewMaterial) -> AppResult<Material> {
        let row = sqlx::query_as::<_, MaterialRow>(&format!(
            r#"
            INSERT INTO materials (name, material_type, color, stock, min_stock)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {MATERIAL_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.material_type)
        .bind(&input.color)
        .bind(input.stock)
        .bind(input.min_stock)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn update_material(
        &self,
        id: Uuid,
        update: &MaterialUpdate,
        stock: Option<StockRequest>,
    ) -> AppResult<Adjusted<Material>> {
        let mut tx = self.db.begin().await?;

        let mut material: Material = sqlx::query_as::<_, MaterialRow>(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Material".to_string()))?
        .into();

        let movement = match &stock {
            Some(request) => plan_movement(material.stock, request.change)?,
            None => None,
        };

        update.apply_fields(&mut material);

        sqlx::query(
            r#"
            UPDATE materials
            SET name = $2, material_type = $3, color = $4, min_stock = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&material.name)
        .bind(&material.material_type)
        .bind(&material.color)
        .bind(material.min_stock)
        .execute(&mut *tx)
        .await?;

        let entry = match &stock {
            Some(request) => record_movement(&mut tx, StockItem::Material(id), movement, request).await?,
            None => None,
        };
        if let Some(movement) = movement {
            material.stock = movement.stock_after;
        }

        tx.commit().await?;

        Ok(Adjusted { record: material, entry })
    }

    async fn adjust_material_stock(&self, id: Uuid, request: StockRequest) -> AppResult<Adjusted<Material>> {
        let mut tx = self.db.begin().await?;
        let entry = apply_stock_change(&mut tx, StockItem::Material(id), &request).await?;
        tx.commit().await?;

        Ok(Adjusted {
            record: self.fetch_material(id).await?,
            entry,
        })
    }

    async fn low_stock_materials(&self) -> AppResult<Vec<Material>> {
        let rows = sqlx::query_as::<_, MaterialRow>(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials WHERE stock < min_stock ORDER BY name"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Material::from).collect())
    }

    async fn list_products(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get_product(&self, id: Uuid) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn insert_product(&self, input: &NewProduct) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products (name, product_type, color, stock, min_stock, sale_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.product_type)
        .bind(&input.color)
        .bind(input.stock)
        .bind(input.min_stock)
        .bind(input.sale_price)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn update_product(
        &self,
        id: Uuid,
        update: &ProductUpdate,
        stock: Option<StockRequest>,
    ) -> AppResult<Adjusted<Product>> {
        let mut tx = self.db.begin().await?;

        let mut product: Product = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?
        .into();

        let movement = match &stock {
            Some(request) => plan_movement(product.stock, request.change)?,
            None => None,
        };

        update.apply_fields(&mut product);

        sqlx::query(
            r#"
            UPDATE products
            SET name = $2, product_type = $3, color = $4, min_stock = $5, sale_price = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&product.name)
        .bind(&product.product_type)
        .bind(&product.color)
        .bind(product.min_stock)
        .bind(product.sale_price)
        .execute(&mut *tx)
        .await?;

        let entry = match &stock {
            Some(request) => record_movement(&mut tx, StockItem::Product(id), movement, request).await?,
            None => None,
        };
        if let Some(movement) = movement {
            product.stock = movement.stock_after;
        }

        tx.commit().await?;

        Ok(Adjusted { record: product, entry })
    }

    async fn adjust_product_stock(&self, id: Uuid, request: StockRequest) -> AppResult<Adjusted<Product>> {
        let mut tx = self.db.begin().await?;
        let entry = apply_stock_change(&mut tx, StockItem::Product(id), &request).await?;
        tx.commit().await?;

        Ok(Adjusted {
            record: self.fetch_product(id).await?,
            entry,
        })
    }

    async fn low_stock_products(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE stock < min_stock ORDER BY name"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn list_suppliers(&self) -> AppResult<Vec<SupplierView>> {
        let rows = sqlx::query_as::<_, SupplierRow>(&format!("{SUPPLIER_SELECT} ORDER BY s.name"))
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(SupplierView::from).collect())
    }

    async fn get_supplier(&self, id: Uuid) -> AppResult<Option<SupplierView>> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!("{SUPPLIER_SELECT} WHERE s.id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(SupplierView::from))
    }

    async fn list_suppliers_by_material(&self, material_id: Uuid) -> AppResult<Vec<SupplierView>> {
        let rows = sqlx::query_as::<_, SupplierRow>(&format!(
            "{SUPPLIER_SELECT} WHERE s.material_id = $1 ORDER BY s.name"
        ))
        .bind(material_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(SupplierView::from).collect())
    }

    async fn supplier_name_taken(&self, name: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM suppliers WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(&self.db)
        .await?;

        Ok(taken)
    }

    async fn insert_supplier(&self, input: &NewSupplier) -> AppResult<SupplierView> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO suppliers (name, contact_person, phone, email, address, material_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.contact_person)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .bind(input.material_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateName(input.name.clone())
            } else {
                AppError::DatabaseError(e)
            }
        })?;

        self.get_supplier(id)
            .await?
            .ok_or_else(|| AppError::Internal("Inserted supplier vanished".to_string()))
    }

    async fn update_supplier(&self, id: Uuid, update: &SupplierUpdate) -> AppResult<Option<SupplierView>> {
        let Some(current) = self.get_supplier(id).await? else {
            return Ok(None);
        };

        let mut supplier = current.supplier;
        update.apply(&mut supplier);

        sqlx::query(
            r#"
            UPDATE suppliers
            SET name = $2, contact_person = $3, phone = $4, email = $5, address = $6, material_id = $7
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&supplier.name)
        .bind(&supplier.contact_person)
        .bind(&supplier.phone)
        .bind(&supplier.email)
        .bind(&supplier.address)
        .bind(supplier.material_id)
        .execute(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateName(supplier.name.clone())
            } else {
                AppError::DatabaseError(e)
            }
        })?;

        self.get_supplier(id).await
    }

    async fn delete_supplier(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn supplier_has_orders(&self, id: Uuid) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM purchase_orders WHERE supplier_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        Ok(exists)
    }

    async fn list_purchase_orders(&self, user_id: Uuid) -> AppResult<Vec<PurchaseOrderView>> {
        let rows = sqlx::query_as::<_, OrderViewRow>(&format!(
            "{ORDER_SELECT} WHERE o.user_id = $1 ORDER BY o.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(PurchaseOrderView::try_from).collect()
    }

    async fn insert_purchase_order(
        &self,
        input: &NewPurchaseOrder,
        supplier: &Supplier,
        user_id: Uuid,
    ) -> AppResult<PurchaseOrderView> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO purchase_orders (quantity, status, supplier_id, material_id, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_at, quantity, status, supplier_id, material_id, user_id
            "#,
        )
        .bind(input.quantity)
        .bind(PurchaseStatus::Pending.as_str())
        .bind(supplier.id)
        .bind(input.material_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(PurchaseOrderView {
            order: row.try_into()?,
            supplier_name: Some(supplier.name.clone()),
        })
    }

    async fn complete_purchase_order(&self, order_id: Uuid, user_id: Uuid) -> AppResult<Adjusted<PurchaseOrderView>> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, OrderViewRow>(&format!(
            "{ORDER_SELECT} WHERE o.id = $1 AND o.user_id = $2 FOR UPDATE OF o"
        ))
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase order".to_string()))?;

        let mut view = PurchaseOrderView::try_from(row)?;
        view.order.mark_completed()?;

        let request = StockRequest {
            change: StockChange::Add(view.order.quantity),
            note: view.order.completion_note(),
            user_id,
        };
        let entry = apply_stock_change(&mut tx, StockItem::Material(view.order.material_id), &request).await?;

        sqlx::query("UPDATE purchase_orders SET status = $2 WHERE id = $1")
            .bind(order_id)
            .bind(view.order.status.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Adjusted { record: view, entry })
    }

    async fn insert_kardex(&self, entry: &NewKardexEntry) -> AppResult<KardexEntry> {
        insert_kardex_row(&self.db, entry).await
    }

    async fn list_kardex(&self, filter: &KardexFilter) -> AppResult<Vec<KardexView>> {
        let rows = sqlx::query_as::<_, KardexViewRow>(
            r#"
            SELECT k.id, k.created_at, k.movement_type, k.quantity, k.stock_before, k.stock_after,
                   k.note, k.material_id, k.product_id, k.user_id,
                   u.username, m.name AS material_name, p.name AS product_name
            FROM kardex k
            LEFT JOIN users u ON u.id = k.user_id
            LEFT JOIN materials m ON m.id = k.material_id
            LEFT JOIN products p ON p.id = k.product_id
            WHERE k.user_id = $1
              AND ($2::uuid IS NULL OR k.material_id = $2)
              AND ($3::uuid IS NULL OR k.product_id = $3)
            ORDER BY k.created_at DESC
            LIMIT $4
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.material_id)
        .bind(filter.product_id)
        .bind(filter.limit)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(KardexView::try_from).collect()
    }

    async fn stock_item_exists(&self, item: StockItem) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            table_for(item)
        ))
        .bind(item.id())
        .fetch_one(&self.db)
        .await?;

        Ok(exists)
    }
}
