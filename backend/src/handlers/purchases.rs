//! HTTP handlers for purchase order endpoints

use axum::{extract::State, http::StatusCode, Json};
use shared::{NewPurchaseOrder, PurchaseOrderView};
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::CurrentUser;
use crate::services::PurchaseService;
use crate::AppState;

/// List the caller's purchase orders
pub async fn list_orders(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<PurchaseOrderView>>> {
    let service = PurchaseService::new(state.store);
    Ok(Json(service.list(current_user.0.user_id).await?))
}

/// Create a purchase order
pub async fn create_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(input): ApiJson<NewPurchaseOrder>,
) -> AppResult<(StatusCode, Json<PurchaseOrderView>)> {
    let service = PurchaseService::new(state.store);
    let order = service.create(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Mark a purchase order as received
pub async fn complete_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(order_id): ApiPath<Uuid>,
) -> AppResult<Json<PurchaseOrderView>> {
    let service = PurchaseService::new(state.store);
    let order = service.complete(current_user.0.user_id, order_id).await?;
    Ok(Json(order))
}
