//! Kardex (stock ledger) service
//!
//! Entries are written by stock changes and, for internal use, directly
//! through [`KardexService::create`]. They are never edited or removed.

use serde::Deserialize;
use shared::{
    validate_limit, KardexEntry, KardexFilter, KardexView, Movement, MovementType, NewKardexEntry,
    StockItem, DEFAULT_ITEM_KARDEX_LIMIT, DEFAULT_KARDEX_LIMIT,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::store::DynStore;

/// Query parameters for the general listing
#[derive(Debug, Default, Deserialize)]
pub struct KardexQuery {
    pub material_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub limit: Option<i64>,
}

/// Query parameters for per-item listings
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

/// Input for recording a movement by hand
#[derive(Debug, Deserialize, Validate)]
pub struct CreateKardexInput {
    pub movement_type: MovementType,
    pub quantity: i32,
    pub stock_before: i32,
    pub stock_after: i32,
    #[validate(length(max = 255))]
    pub note: Option<String>,
    pub material_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
}

/// Kardex service
#[derive(Clone)]
pub struct KardexService {
    store: DynStore,
}

impl KardexService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    /// The user's entries, newest first, optionally narrowed to one item
    pub async fn list(&self, user_id: Uuid, query: KardexQuery) -> AppResult<Vec<KardexView>> {
        let filter = KardexFilter {
            user_id,
            material_id: query.material_id,
            product_id: query.product_id,
            limit: Self::limit(query.limit, DEFAULT_KARDEX_LIMIT)?,
        };
        self.store.list_kardex(&filter).await
    }

    pub async fn list_for_material(
        &self,
        user_id: Uuid,
        material_id: Uuid,
        limit: Option<i64>,
    ) -> AppResult<Vec<KardexView>> {
        self.list_for_item(user_id, StockItem::Material(material_id), limit).await
    }

    pub async fn list_for_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        limit: Option<i64>,
    ) -> AppResult<Vec<KardexView>> {
        self.list_for_item(user_id, StockItem::Product(product_id), limit).await
    }

    /// Record a movement without touching the item's stock
    pub async fn create(&self, user_id: Uuid, input: CreateKardexInput) -> AppResult<KardexEntry> {
        input.validate()?;

        let item = StockItem::from_refs(input.material_id, input.product_id)
            .map_err(|msg| AppError::validation("material_id", msg))?;
        let movement = Movement::checked(
            input.movement_type,
            input.quantity,
            input.stock_before,
            input.stock_after,
        )?;
        self.ensure_exists(item).await?;

        let entry = self
            .store
            .insert_kardex(&NewKardexEntry {
                item,
                movement,
                note: input.note,
                user_id,
            })
            .await?;

        tracing::info!(
            entry_id = %entry.id,
            item_id = %item.id(),
            movement = %entry.movement_type,
            quantity = entry.quantity,
            "Kardex entry recorded"
        );

        Ok(entry)
    }

    async fn list_for_item(&self, user_id: Uuid, item: StockItem, limit: Option<i64>) -> AppResult<Vec<KardexView>> {
        let limit = Self::limit(limit, DEFAULT_ITEM_KARDEX_LIMIT)?;
        self.ensure_exists(item).await?;

        let filter = KardexFilter {
            user_id,
            material_id: item.material_id(),
            product_id: item.product_id(),
            limit,
        };
        self.store.list_kardex(&filter).await
    }

    async fn ensure_exists(&self, item: StockItem) -> AppResult<()> {
        if !self.store.stock_item_exists(item).await? {
            return Err(AppError::NotFound(item.resource().to_string()));
        }
        Ok(())
    }

    fn limit(requested: Option<i64>, default: i64) -> AppResult<i64> {
        let limit = requested.unwrap_or(default);
        validate_limit(limit).map_err(|msg| AppError::validation("limit", msg))?;
        Ok(limit)
    }
}
