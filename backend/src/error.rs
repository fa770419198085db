//! Error handling for the glass stock server
//!
//! Every failure is a distinct, user-visible `AppError` rendered as
//! `{"error": {"code", "message", "field"}}`.

use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{OrderError, StockError};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("User already exists: {0}")]
    DuplicateUser(String),

    #[error("Name already in use: {0}")]
    DuplicateName(String),

    #[error("Conflict: {message}")]
    Conflict { resource: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i32, requested: i32 },

    #[error("Purchase order {0} is already completed")]
    AlreadyCompleted(Uuid),

    #[error("Supplier '{supplier}' does not supply material '{material}'")]
    AssociationMismatch { supplier: String, material: String },

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a field-scoped validation failure
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::InvalidToken | AppError::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Validation { .. }
            | AppError::ValidationError(_)
            | AppError::AssociationMismatch { .. } => StatusCode::BAD_REQUEST,
            AppError::DuplicateUser(_)
            | AppError::DuplicateName(_)
            | AppError::Conflict { .. }
            | AppError::AlreadyCompleted(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InsufficientStock { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DatabaseError(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Validation { .. } | AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::DuplicateUser(_) => "DUPLICATE_USER",
            AppError::DuplicateName(_) => "DUPLICATE_NAME",
            AppError::Conflict { .. } => "CONFLICT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            AppError::AlreadyCompleted(_) => "ALREADY_COMPLETED",
            AppError::AssociationMismatch { .. } => "ASSOCIATION_MISMATCH",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<StockError> for AppError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::Insufficient { available, requested } => {
                AppError::InsufficientStock { available, requested }
            }
            StockError::NonPositiveQuantity(_) => AppError::validation("quantity", err.to_string()),
            StockError::NegativeStock(_) | StockError::Overflow => {
                AppError::validation("stock", err.to_string())
            }
            StockError::Unbalanced { .. } => AppError::validation("stock_after", err.to_string()),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::AlreadyCompleted(id) => AppError::AlreadyCompleted(id),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        match fields.first() {
            Some((field, errs)) => {
                let reason = errs
                    .first()
                    .map(|e| e.code.to_string())
                    .unwrap_or_else(|| "invalid".to_string());
                AppError::validation(field, format!("Invalid value for '{}': {}", field, reason))
            }
            None => AppError::ValidationError(errors.to_string()),
        }
    }
}

// Extractor rejections: the request itself could not be read

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation("body", rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::validation("body", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::validation("query", rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::validation("path", rejection.body_text())
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details stay in the logs
        let message = match &self {
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            AppError::Validation { message, .. } => message.clone(),
            AppError::Conflict { message, .. } => message.clone(),
            other => other.to_string(),
        };

        let field = match &self {
            AppError::Validation { field, .. } => Some(field.clone()),
            AppError::Conflict { resource, .. } => Some(resource.clone()),
            AppError::DuplicateUser(_) => Some("username".to_string()),
            AppError::DuplicateName(_) => Some("name".to_string()),
            _ => None,
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request failed: {}", self);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message,
                field,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_error_mapping() {
        let err: AppError = StockError::Insufficient {
            available: 2,
            requested: 5,
        }
        .into();
        assert!(matches!(
            err,
            AppError::InsufficientStock {
                available: 2,
                requested: 5
            }
        ));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: AppError = StockError::NonPositiveQuantity(0).into();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::AlreadyCompleted(Uuid::nil()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::NotFound("Material".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Internal("hash".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::Internal("hash".into()).code(), "INTERNAL_ERROR");
        assert_eq!(
            AppError::AssociationMismatch {
                supplier: "S".into(),
                material: "M".into()
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
    }
}
