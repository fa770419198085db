//! Business logic services for the glass stock server

pub mod auth;
pub mod inventory;
pub mod kardex;
pub mod materials;
pub mod products;
pub mod purchases;
pub mod stock;
pub mod suppliers;

pub use auth::AuthService;
pub use inventory::InventoryService;
pub use kardex::KardexService;
pub use materials::MaterialService;
pub use products::ProductService;
pub use purchases::PurchaseService;
pub use stock::StockService;
pub use suppliers::SupplierService;
