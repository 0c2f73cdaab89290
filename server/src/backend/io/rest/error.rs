//! Translation of domain errors into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::{error, warn};
use serde::Serialize;

use crate::backend::domain::{DonorError, ExportError};

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    Donor(DonorError),
    Export(ExportError),
}

impl From<DonorError> for ApiError {
    fn from(e: DonorError) -> Self {
        ApiError::Donor(e)
    }
}

impl From<ExportError> for ApiError {
    fn from(e: ExportError) -> Self {
        ApiError::Export(e)
    }
}

/// Bare store failures from read-only calls
impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Donor(DonorError::Storage(e))
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Donor(DonorError::Validation(_)) => (StatusCode::BAD_REQUEST, "validation_error"),
            ApiError::Donor(DonorError::Duplicate) => (StatusCode::CONFLICT, "duplicate"),
            ApiError::Donor(DonorError::Storage(_)) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            ApiError::Export(ExportError::NoData) => (StatusCode::NOT_FOUND, "no_data"),
            ApiError::Export(ExportError::Failed(_)) => (StatusCode::INTERNAL_SERVER_ERROR, "export_failed"),
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Donor(e) => e.to_string(),
            ApiError::Export(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        let message = self.message();

        if status.is_server_error() {
            error!("{} ({}): {}", status, code, message);
        } else {
            warn!("{} ({}): {}", status, code, message);
        }

        (status, Json(ErrorBody { error: code, message })).into_response()
    }
}
