//! HTTP handlers for product endpoints

use axum::{extract::State, Json};
use shared::{NewProduct, Product, ProductUpdate};
use uuid::Uuid;

use super::QuantityQuery;
use crate::error::AppResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::services::{ProductService, StockService};
use crate::AppState;

pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.store);
    Ok(Json(service.list().await?))
}

pub async fn get_product(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.store);
    Ok(Json(service.get(id).await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewProduct>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.store);
    Ok(Json(service.create(input).await?))
}

pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.store);
    let product = service.update(id, update, current_user.0.user_id).await?;
    Ok(Json(product))
}

pub async fn add_product_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<QuantityQuery>,
) -> AppResult<Json<Product>> {
    let service = StockService::new(state.store);
    let product = service
        .add_product(id, query.quantity, current_user.0.user_id)
        .await?;
    Ok(Json(product))
}

pub async fn remove_product_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<QuantityQuery>,
) -> AppResult<Json<Product>> {
    let service = StockService::new(state.store);
    let product = service
        .remove_product(id, query.quantity, current_user.0.user_id)
        .await?;
    Ok(Json(product))
}
