//! Domain models for the stock tracking platform

mod kardex;
mod material;
mod product;
mod purchase;
mod supplier;
mod user;

pub use kardex::*;
pub use material::*;
pub use product::*;
pub use purchase::*;
pub use supplier::*;
pub use user::*;
