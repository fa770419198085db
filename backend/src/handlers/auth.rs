//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use shared::{NewUser, User};

use crate::error::AppError;
use crate::extract::{ApiForm, ApiJson};
use crate::services::auth::{AuthService, AuthTokens};
use crate::AppState;

/// OAuth2-style password form
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<LoginForm>,
) -> Result<Json<AuthTokens>, AppError> {
    let auth_service = AuthService::new(state.store.clone(), &state.config.jwt);
    let tokens = auth_service.login(&form.username, &form.password).await?;
    Ok(Json(tokens))
}

/// Register endpoint handler
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let auth_service = AuthService::new(state.store.clone(), &state.config.jwt);
    let user = auth_service.register(body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
