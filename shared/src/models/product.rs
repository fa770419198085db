//! Finished product models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::StockLevel;
use crate::validation::validate_price;

/// A finished product kept in stock and sold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub color: Option<String>,
    pub stock: i32,
    pub min_stock: i32,
    pub sale_price: Decimal,
}

impl StockLevel for Product {
    fn stock(&self) -> i32 {
        self.stock
    }

    fn min_stock(&self) -> i32 {
        self.min_stock
    }
}

/// Input for creating a product
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub product_type: String,
    #[validate(length(max = 50))]
    pub color: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub min_stock: i32,
    #[validate(custom = "validate_price")]
    pub sale_price: Decimal,
}

/// Partial update of a product
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProductUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub product_type: Option<String>,
    #[validate(length(max = 50))]
    pub color: Option<String>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    #[validate(range(min = 0))]
    pub min_stock: Option<i32>,
    #[validate(custom = "validate_price")]
    pub sale_price: Option<Decimal>,
}

impl ProductUpdate {
    /// Apply every descriptive field that is set; stock is planned separately
    pub fn apply_fields(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(product_type) = &self.product_type {
            product.product_type = product_type.clone();
        }
        if let Some(color) = &self.color {
            product.color = Some(color.clone());
        }
        if let Some(min_stock) = self.min_stock {
            product.min_stock = min_stock;
        }
        if let Some(sale_price) = self.sale_price {
            product.sale_price = sale_price;
        }
    }
}
