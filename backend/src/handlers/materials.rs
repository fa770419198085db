//! HTTP handlers for material endpoints

use axum::{extract::State, Json};
use shared::{Material, MaterialUpdate, NewMaterial, SupplierView};
use uuid::Uuid;

use super::QuantityQuery;
use crate::error::AppResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::services::{MaterialService, StockService};
use crate::AppState;

/// List all materials
pub async fn list_materials(State(state): State<AppState>) -> AppResult<Json<Vec<Material>>> {
    let service = MaterialService::new(state.store);
    Ok(Json(service.list().await?))
}

/// Get a material by id
pub async fn get_material(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> AppResult<Json<Material>> {
    let service = MaterialService::new(state.store);
    Ok(Json(service.get(id).await?))
}

/// Create a material
pub async fn create_material(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewMaterial>,
) -> AppResult<Json<Material>> {
    let service = MaterialService::new(state.store);
    Ok(Json(service.create(input).await?))
}

/// Partially update a material
pub async fn update_material(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<MaterialUpdate>,
) -> AppResult<Json<Material>> {
    let service = MaterialService::new(state.store);
    let material = service.update(id, update, current_user.0.user_id).await?;
    Ok(Json(material))
}

/// Add stock to a material
pub async fn add_material_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<QuantityQuery>,
) -> AppResult<Json<Material>> {
    let service = StockService::new(state.store);
    let material = service
        .add_material(id, query.quantity, current_user.0.user_id)
        .await?;
    Ok(Json(material))
}

/// Withdraw stock from a material
pub async fn remove_material_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<QuantityQuery>,
) -> AppResult<Json<Material>> {
    let service = StockService::new(state.store);
    let material = service
        .remove_material(id, query.quantity, current_user.0.user_id)
        .await?;
    Ok(Json(material))
}

/// Suppliers of a material
pub async fn material_suppliers(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Vec<SupplierView>>> {
    let service = MaterialService::new(state.store);
    Ok(Json(service.suppliers(id).await?))
}
