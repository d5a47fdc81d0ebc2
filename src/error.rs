//! Error types and handling.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing, malformed or expired token, or wrong credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed
    #[error("{0}")]
    Forbidden(String),

    /// Request conflicts with the current state of a record
    #[error("{0}")]
    Conflict(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excel or PDF export error
    #[error("Export error: {0}")]
    Export(String),

    /// Password hashing error
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// Token signing error
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Notification delivery failed
    #[error("Notification error: {0}")]
    Notification(String),

    /// Validation error
    #[error("{0}")]
    Validation(String),

    /// Record not found
    #[error("{0}")]
    NotFound(String),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create an unauthorized error with message
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create a forbidden error with message
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create a conflict error with message
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a config error with message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an export error with message
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Create a validation error with message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error with message
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Http(_) | Self::Notification(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Export(_)
            | Self::PasswordHash(_)
            | Self::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(error: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export(error.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            match self {
                Self::Http(_) | Self::Notification(_) => "Gagal menghubungi layanan eksternal".to_string(),
                _ => "Terjadi kesalahan pada server".to_string(),
            }
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
            self.to_string()
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_4xx() {
        assert_eq!(AppError::unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::not_found("x").status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Database(sea_orm::DbErr::Custom("secret table".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_client_error_message_is_plain() {
        let err = AppError::not_found("Siswa tidak ditemukan");
        assert_eq!(err.to_string(), "Siswa tidak ditemukan");
    }
}
