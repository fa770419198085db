//! Stock arithmetic and movement planning
//!
//! Every stock change in the system goes through [`plan_movement`], which
//! decides whether a change produces a ledger movement and what that
//! movement looks like. Stores only persist what this module returns.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::MovementType;

/// A requested change to the stock of a material or product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockChange {
    /// Receive `n` units
    Add(i32),
    /// Withdraw `n` units
    Remove(i32),
    /// Replace the stock with an absolute value
    Set(i32),
}

impl StockChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockChange::Add(_) => "add",
            StockChange::Remove(_) => "remove",
            StockChange::Set(_) => "set",
        }
    }
}

/// Errors raised while planning a stock movement
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    #[error("Quantity must be positive, got {0}")]
    NonPositiveQuantity(i32),

    #[error("Stock cannot be negative, got {0}")]
    NegativeStock(i32),

    #[error("Insufficient stock: {available} available, {requested} requested")]
    Insufficient { available: i32, requested: i32 },

    #[error("Stock value out of range")]
    Overflow,

    #[error("Movement does not balance: {stock_before} {movement_type} {quantity} != {stock_after}")]
    Unbalanced {
        movement_type: MovementType,
        quantity: i32,
        stock_before: i32,
        stock_after: i32,
    },
}

/// A single stock movement, as recorded in the kardex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub movement_type: MovementType,
    pub quantity: i32,
    pub stock_before: i32,
    pub stock_after: i32,
}

impl Movement {
    /// Build a movement from its type, quantity and starting stock
    pub fn new(movement_type: MovementType, quantity: i32, stock_before: i32) -> Result<Self, StockError> {
        if quantity <= 0 {
            return Err(StockError::NonPositiveQuantity(quantity));
        }

        let stock_after = match movement_type {
            MovementType::In => stock_before.checked_add(quantity).ok_or(StockError::Overflow)?,
            MovementType::Out => {
                if quantity > stock_before {
                    return Err(StockError::Insufficient {
                        available: stock_before,
                        requested: quantity,
                    });
                }
                stock_before - quantity
            }
        };

        Ok(Self {
            movement_type,
            quantity,
            stock_before,
            stock_after,
        })
    }

    /// Check a fully specified movement, e.g. one submitted by hand
    pub fn checked(
        movement_type: MovementType,
        quantity: i32,
        stock_before: i32,
        stock_after: i32,
    ) -> Result<Self, StockError> {
        if stock_before < 0 {
            return Err(StockError::NegativeStock(stock_before));
        }

        let movement = Self::new(movement_type, quantity, stock_before)?;
        if movement.stock_after != stock_after {
            return Err(StockError::Unbalanced {
                movement_type,
                quantity,
                stock_before,
                stock_after,
            });
        }

        Ok(movement)
    }

    /// Signed delta applied to the stock
    pub fn delta(&self) -> i32 {
        match self.movement_type {
            MovementType::In => self.quantity,
            MovementType::Out => -self.quantity,
        }
    }
}

/// Plan the movement produced by applying `change` to `stock_before`.
///
/// Returns `Ok(None)` when the change leaves the stock untouched, which only
/// happens for `Set` with the current value.
pub fn plan_movement(stock_before: i32, change: StockChange) -> Result<Option<Movement>, StockError> {
    match change {
        StockChange::Add(quantity) => Movement::new(MovementType::In, quantity, stock_before).map(Some),
        StockChange::Remove(quantity) => Movement::new(MovementType::Out, quantity, stock_before).map(Some),
        StockChange::Set(stock_after) => {
            if stock_after < 0 {
                return Err(StockError::NegativeStock(stock_after));
            }
            if stock_after == stock_before {
                return Ok(None);
            }

            let (movement_type, quantity) = if stock_after > stock_before {
                (MovementType::In, stock_after - stock_before)
            } else {
                (MovementType::Out, stock_before - stock_after)
            };

            Ok(Some(Movement {
                movement_type,
                quantity,
                stock_before,
                stock_after,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_add_produces_in_movement() {
        let movement = plan_movement(5, StockChange::Add(10)).unwrap().unwrap();
        assert_eq!(movement.movement_type, MovementType::In);
        assert_eq!(movement.quantity, 10);
        assert_eq!(movement.stock_before, 5);
        assert_eq!(movement.stock_after, 15);
    }

    #[test]
    fn test_remove_produces_out_movement() {
        let movement = plan_movement(20, StockChange::Remove(8)).unwrap().unwrap();
        assert_eq!(movement.movement_type, MovementType::Out);
        assert_eq!(movement.stock_after, 12);
    }

    #[test]
    fn test_remove_entire_stock() {
        let movement = plan_movement(7, StockChange::Remove(7)).unwrap().unwrap();
        assert_eq!(movement.stock_after, 0);
    }

    #[test]
    fn test_remove_more_than_available() {
        assert_eq!(
            plan_movement(3, StockChange::Remove(4)),
            Err(StockError::Insufficient {
                available: 3,
                requested: 4
            })
        );
    }

    #[test]
    fn test_zero_and_negative_quantities_rejected() {
        assert_eq!(plan_movement(3, StockChange::Add(0)), Err(StockError::NonPositiveQuantity(0)));
        assert_eq!(plan_movement(3, StockChange::Remove(-2)), Err(StockError::NonPositiveQuantity(-2)));
    }

    #[test]
    fn test_add_overflow() {
        assert_eq!(plan_movement(i32::MAX, StockChange::Add(1)), Err(StockError::Overflow));
    }

    #[test]
    fn test_set_same_value_is_not_a_movement() {
        assert_eq!(plan_movement(12, StockChange::Set(12)), Ok(None));
    }

    #[test]
    fn test_set_lower_value_is_out() {
        let movement = plan_movement(12, StockChange::Set(4)).unwrap().unwrap();
        assert_eq!(movement.movement_type, MovementType::Out);
        assert_eq!(movement.quantity, 8);
    }

    #[test]
    fn test_set_negative_rejected() {
        assert_eq!(plan_movement(12, StockChange::Set(-1)), Err(StockError::NegativeStock(-1)));
    }

    #[test]
    fn test_checked_movement_must_balance() {
        assert!(Movement::checked(MovementType::In, 5, 10, 15).is_ok());
        assert!(matches!(
            Movement::checked(MovementType::In, 5, 10, 14),
            Err(StockError::Unbalanced { .. })
        ));
        assert!(matches!(
            Movement::checked(MovementType::Out, 5, 3, -2),
            Err(StockError::Insufficient { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_movement_balances(before in 0i32..1_000_000, change in prop_oneof![
            (1i32..10_000).prop_map(StockChange::Add),
            (1i32..10_000).prop_map(StockChange::Remove),
            (0i32..1_000_000).prop_map(StockChange::Set),
        ]) {
            if let Ok(Some(m)) = plan_movement(before, change) {
                prop_assert!(m.quantity > 0);
                prop_assert_eq!(m.stock_before, before);
                prop_assert_eq!(m.stock_after, before + m.delta());
                prop_assert!(m.stock_after >= 0);
            }
        }

        #[test]
        fn prop_remove_never_goes_negative(before in 0i32..1000, qty in 1i32..2000) {
            match plan_movement(before, StockChange::Remove(qty)) {
                Ok(Some(m)) => prop_assert!(qty <= before && m.stock_after == before - qty),
                Err(StockError::Insufficient { available, requested }) => {
                    prop_assert!(qty > before);
                    prop_assert_eq!(available, before);
                    prop_assert_eq!(requested, qty);
                }
                other => prop_assert!(false, "unexpected result {:?}", other),
            }
        }
    }
}
