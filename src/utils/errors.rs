//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("user already exists")]
    UserAlreadyExists,

    #[error("user not found")]
    UserNotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("vehicle not found")]
    VehicleNotFound,

    #[error("booking not found")]
    BookingNotFound,

    #[error("booking already cancelled")]
    BookingAlreadyCancelled,

    #[error("booking already finished")]
    BookingAlreadyFinished,

    #[error("booking already started")]
    BookingAlreadyStarted,

    #[error("booking not started")]
    BookingNotStarted,

    #[error("booking not finished")]
    BookingNotFinished,

    #[error("booking already have feedback")]
    BookingAlreadyHaveFeedback,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Mapeo fijo de cada error a su status HTTP
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UserAlreadyExists => StatusCode::CONFLICT,
            AppError::UserNotFound
            | AppError::VehicleNotFound
            | AppError::BookingNotFound => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::BookingAlreadyCancelled
            | AppError::BookingAlreadyFinished
            | AppError::BookingAlreadyStarted
            | AppError::BookingNotStarted
            | AppError::BookingNotFinished
            | AppError::BookingAlreadyHaveFeedback => StatusCode::BAD_REQUEST,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("❌ {}", self);
        } else {
            tracing::debug!("{}", self);
        }

        // El mensaje se devuelve tal cual, sin reintentos ni recuperación
        let body = Json(json!({
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::UserAlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::BookingNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::BookingAlreadyStarted.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::BookingAlreadyHaveFeedback.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_messages_are_verbatim() {
        assert_eq!(AppError::InvalidCredentials.to_string(), "invalid credentials");
        assert_eq!(AppError::BookingAlreadyCancelled.to_string(), "booking already cancelled");
        assert_eq!(
            AppError::BookingAlreadyHaveFeedback.to_string(),
            "booking already have feedback"
        );
    }
}
