use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::domain::models::ParseEnumError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Payment provider error: {0}")]
    Payment(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("Upstream error: {0}")]
    Upstream(String),
    #[error("Internal server error")]
    Internal,
}

impl From<ParseEnumError> for AppError {
    fn from(e: ParseEnumError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite unique, 23505 = PostgreSQL unique
                    if code == "2067" || code == "23505" {
                        return conflict("Resource already exists (duplicate entry)");
                    }
                    // 787 = SQLite foreign key, 23503 = PostgreSQL foreign key
                    if code == "787" || code == "23503" {
                        return conflict("Resource is referenced by or references a missing record");
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Payment(detail) => {
                error!("Payment provider error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create invoice".to_string())
            }
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            AppError::Upstream(detail) => {
                error!("Upstream error: {}", detail);
                (StatusCode::BAD_GATEWAY, "Upstream service failed".to_string())
            }
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

fn conflict(message: &str) -> Response {
    (StatusCode::CONFLICT, Json(json!({ "error": message }))).into_response()
}
