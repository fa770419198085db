//! Common types used across the platform

/// Anything that carries an on-hand quantity and a reorder threshold
pub trait StockLevel {
    fn stock(&self) -> i32;

    fn min_stock(&self) -> i32;

    /// Stock strictly below the configured minimum
    fn is_low_stock(&self) -> bool {
        self.stock() < self.min_stock()
    }
}

/// Default number of kardex entries returned by the general listing
pub const DEFAULT_KARDEX_LIMIT: i64 = 100;

/// Default number of kardex entries returned for a single material or product
pub const DEFAULT_ITEM_KARDEX_LIMIT: i64 = 50;

/// Upper bound for any kardex listing
pub const MAX_KARDEX_LIMIT: i64 = 1000;
