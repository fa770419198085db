//! Shared types and models for the glass stock platform
//!
//! Holds the domain models and the pure stock rules used by every storage
//! backend, so the arithmetic lives in exactly one place.

pub mod models;
pub mod stock;
pub mod types;
pub mod validation;

pub use models::*;
pub use stock::*;
pub use types::*;
pub use validation::*;
