//! HTTP handlers for the glass stock API

pub mod auth;
pub mod health;
pub mod inventory;
pub mod kardex;
pub mod materials;
pub mod products;
pub mod purchases;
pub mod suppliers;

use serde::Deserialize;

pub use auth::*;
pub use health::*;
pub use inventory::*;
pub use kardex::*;
pub use materials::*;
pub use products::*;
pub use purchases::*;
pub use suppliers::*;

/// `?quantity=` for stock entries and withdrawals
#[derive(Debug, Deserialize)]
pub struct QuantityQuery {
    pub quantity: i32,
}
