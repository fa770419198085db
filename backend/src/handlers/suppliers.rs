//! HTTP handlers for supplier endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use shared::{NewSupplier, SupplierUpdate, SupplierView};
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{ApiJson, ApiPath};
use crate::services::SupplierService;
use crate::AppState;

#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// List all suppliers
pub async fn list_suppliers(State(state): State<AppState>) -> AppResult<Json<Vec<SupplierView>>> {
    let service = SupplierService::new(state.store);
    Ok(Json(service.list().await?))
}

/// Get a supplier by id
pub async fn get_supplier(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<SupplierView>> {
    let service = SupplierService::new(state.store);
    Ok(Json(service.get(id).await?))
}

/// Suppliers of a material
pub async fn suppliers_by_material(
    State(state): State<AppState>,
    ApiPath(material_id): ApiPath<Uuid>,
) -> AppResult<Json<Vec<SupplierView>>> {
    let service = SupplierService::new(state.store);
    Ok(Json(service.list_by_material(material_id).await?))
}

/// Create a supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewSupplier>,
) -> AppResult<(StatusCode, Json<SupplierView>)> {
    let service = SupplierService::new(state.store);
    let supplier = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// Update a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<SupplierUpdate>,
) -> AppResult<Json<SupplierView>> {
    let service = SupplierService::new(state.store);
    Ok(Json(service.update(id, update).await?))
}

/// Delete a supplier
pub async fn delete_supplier(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    let service = SupplierService::new(state.store);
    service.delete(id).await?;
    Ok(Json(DeleteResponse {
        message: "Supplier deleted".to_string(),
    }))
}
