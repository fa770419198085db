//! HTTP handlers for kardex endpoints

use axum::{extract::State, http::StatusCode, Json};
use shared::{KardexEntry, KardexView};
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::services::kardex::{CreateKardexInput, KardexQuery, KardexService, LimitQuery};
use crate::AppState;

/// List the caller's kardex entries
pub async fn list_kardex(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiQuery(query): ApiQuery<KardexQuery>,
) -> AppResult<Json<Vec<KardexView>>> {
    let service = KardexService::new(state.store);
    Ok(Json(service.list(current_user.0.user_id, query).await?))
}

/// Kardex of one material
pub async fn material_kardex(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(material_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> AppResult<Json<Vec<KardexView>>> {
    let service = KardexService::new(state.store);
    let entries = service
        .list_for_material(current_user.0.user_id, material_id, query.limit)
        .await?;
    Ok(Json(entries))
}

/// Kardex of one product
pub async fn product_kardex(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiPath(product_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> AppResult<Json<Vec<KardexView>>> {
    let service = KardexService::new(state.store);
    let entries = service
        .list_for_product(current_user.0.user_id, product_id, query.limit)
        .await?;
    Ok(Json(entries))
}

/// Record a kardex entry by hand (internal use)
pub async fn create_kardex_entry(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ApiJson(input): ApiJson<CreateKardexInput>,
) -> AppResult<(StatusCode, Json<KardexEntry>)> {
    let service = KardexService::new(state.store);
    let entry = service.create(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
