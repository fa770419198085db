//! Kardex (stock ledger) models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::stock::Movement;

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    In,
    Out,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::In => "in",
            MovementType::Out => "out",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(MovementType::In),
            "out" => Ok(MovementType::Out),
            other => Err(format!("unknown movement type '{}'", other)),
        }
    }
}

/// The stock-bearing entity a kardex entry refers to
///
/// Serialized flat as either `material_id` or `product_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockItem {
    #[serde(rename = "material_id")]
    Material(Uuid),
    #[serde(rename = "product_id")]
    Product(Uuid),
}

impl StockItem {
    /// Build from optional references; exactly one must be present
    pub fn from_refs(material_id: Option<Uuid>, product_id: Option<Uuid>) -> Result<Self, &'static str> {
        match (material_id, product_id) {
            (Some(id), None) => Ok(StockItem::Material(id)),
            (None, Some(id)) => Ok(StockItem::Product(id)),
            (None, None) => Err("Either material_id or product_id must be provided"),
            (Some(_), Some(_)) => Err("material_id and product_id cannot both be provided"),
        }
    }

    pub fn material_id(&self) -> Option<Uuid> {
        match self {
            StockItem::Material(id) => Some(*id),
            StockItem::Product(_) => None,
        }
    }

    pub fn product_id(&self) -> Option<Uuid> {
        match self {
            StockItem::Product(id) => Some(*id),
            StockItem::Material(_) => None,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            StockItem::Material(id) | StockItem::Product(id) => *id,
        }
    }

    /// Human-readable resource name, used in error messages
    pub fn resource(&self) -> &'static str {
        match self {
            StockItem::Material(_) => "Material",
            StockItem::Product(_) => "Product",
        }
    }
}

/// An immutable kardex entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KardexEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub stock_before: i32,
    pub stock_after: i32,
    pub note: Option<String>,
    #[serde(flatten)]
    pub item: StockItem,
    pub user_id: Uuid,
}

impl KardexEntry {
    pub fn movement(&self) -> Movement {
        Movement {
            movement_type: self.movement_type,
            quantity: self.quantity,
            stock_before: self.stock_before,
            stock_after: self.stock_after,
        }
    }
}

/// A kardex entry waiting to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewKardexEntry {
    pub item: StockItem,
    pub movement: Movement,
    pub note: Option<String>,
    pub user_id: Uuid,
}

/// Kardex entry enriched with the names of what it references
#[derive(Debug, Clone, Serialize)]
pub struct KardexView {
    #[serde(flatten)]
    pub entry: KardexEntry,
    pub username: Option<String>,
    pub material_name: Option<String>,
    pub product_name: Option<String>,
}

/// Query for listing kardex entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KardexFilter {
    pub user_id: Uuid,
    pub material_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub limit: i64,
}

impl KardexFilter {
    pub fn matches(&self, entry: &KardexEntry) -> bool {
        entry.user_id == self.user_id
            && self.material_id.map_or(true, |id| entry.item.material_id() == Some(id))
            && self.product_id.map_or(true, |id| entry.item.product_id() == Some(id))
    }
}
