//! HTTP handlers for inventory alerts

use axum::{extract::State, Json};
use shared::{Material, Product};

use crate::error::AppResult;
use crate::services::InventoryService;
use crate::AppState;

/// Materials below their minimum stock
pub async fn material_alerts(State(state): State<AppState>) -> AppResult<Json<Vec<Material>>> {
    let service = InventoryService::new(state.store);
    Ok(Json(service.material_alerts().await?))
}

/// Products below their minimum stock
pub async fn product_alerts(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let service = InventoryService::new(state.store);
    Ok(Json(service.product_alerts().await?))
}
