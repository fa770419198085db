//! Purchase order models and their state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

/// Purchase order status. The only transition is pending -> completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Pending,
    Completed,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PurchaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PurchaseStatus::Pending),
            "completed" => Ok(PurchaseStatus::Completed),
            other => Err(format!("unknown purchase order status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("Purchase order {0} is already completed")]
    AlreadyCompleted(Uuid),
}

/// A request to replenish a material from one of its suppliers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub quantity: i32,
    pub status: PurchaseStatus,
    pub supplier_id: Uuid,
    pub material_id: Uuid,
    pub user_id: Uuid,
}

impl PurchaseOrder {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Move the order to `completed`. Fails rather than no-ops when the
    /// order was already completed.
    pub fn mark_completed(&mut self) -> Result<(), OrderError> {
        match self.status {
            PurchaseStatus::Pending => {
                self.status = PurchaseStatus::Completed;
                Ok(())
            }
            PurchaseStatus::Completed => Err(OrderError::AlreadyCompleted(self.id)),
        }
    }

    /// Kardex note recorded when the order is received
    pub fn completion_note(&self) -> String {
        format!("Purchase order #{} completed", self.id)
    }
}

/// Purchase order with its supplier's name
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOrderView {
    #[serde(flatten)]
    pub order: PurchaseOrder,
    pub supplier_name: Option<String>,
}

/// Input for creating a purchase order
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewPurchaseOrder {
    pub supplier_id: Uuid,
    pub material_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> PurchaseOrder {
        PurchaseOrder {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            quantity: 10,
            status: PurchaseStatus::Pending,
            supplier_id: Uuid::new_v4(),
            material_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_complete_once() {
        let mut order = order();
        assert!(order.mark_completed().is_ok());
        assert_eq!(order.status, PurchaseStatus::Completed);
        assert_eq!(order.mark_completed(), Err(OrderError::AlreadyCompleted(order.id)));
        assert_eq!(order.status, PurchaseStatus::Completed);
    }

    #[test]
    fn test_completion_note_names_order() {
        let order = order();
        assert!(order.completion_note().contains(&order.id.to_string()));
    }

    #[test]
    fn test_quantity_must_be_positive() {
        let input = NewPurchaseOrder {
            supplier_id: Uuid::new_v4(),
            material_id: Uuid::new_v4(),
            quantity: 0,
        };
        assert!(input.validate().is_err());
    }
}
