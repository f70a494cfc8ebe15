//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::estimating::models::EstimateError;
use crate::estimating::responses::ErrorResponse;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Estimate(#[from] EstimateError),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            AppError::Estimate(EstimateError::InvalidDimension { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_dimension")
            }
            AppError::Estimate(EstimateError::InvalidOption { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_option")
            }
            AppError::Estimate(EstimateError::InvalidMargin(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_margin")
            }
            AppError::Estimate(EstimateError::Configuration(message)) => {
                tracing::error!("Configuration error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
            }
            AppError::Persistence(message) => {
                tracing::error!("Persistence error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, "persistence_error")
            }
        };

        let body = ErrorResponse {
            error_type: error_type.to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
