//! Raw material models

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::StockLevel;

/// A raw material kept in stock (glass, metal, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub material_type: String,
    pub color: Option<String>,
    pub stock: i32,
    pub min_stock: i32,
}

impl StockLevel for Material {
    fn stock(&self) -> i32 {
        self.stock
    }

    fn min_stock(&self) -> i32 {
        self.min_stock
    }
}

/// Input for creating a material
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewMaterial {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub material_type: String,
    #[validate(length(max = 50))]
    pub color: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub min_stock: i32,
}

/// Partial update of a material; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MaterialUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub material_type: Option<String>,
    #[validate(length(max = 50))]
    pub color: Option<String>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    #[validate(range(min = 0))]
    pub min_stock: Option<i32>,
}

impl MaterialUpdate {
    /// Apply every descriptive field that is set. Stock is not touched here:
    /// it goes through the stock planner so the change lands in the kardex.
    pub fn apply_fields(&self, material: &mut Material) {
        if let Some(name) = &self.name {
            material.name = name.clone();
        }
        if let Some(material_type) = &self.material_type {
            material.material_type = material_type.clone();
        }
        if let Some(color) = &self.color {
            material.color = Some(color.clone());
        }
        if let Some(min_stock) = self.min_stock {
            material.min_stock = min_stock;
        }
    }
}
