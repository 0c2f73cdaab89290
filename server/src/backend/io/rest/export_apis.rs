//! # REST API for Data Export
//!
//! Endpoints that return donor data as downloadable files.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use log::info;
use shared::CampInfo;

use crate::backend::io::rest::error::ApiError;
use crate::backend::AppState;

fn attachment(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename)
}

/// Every donor as `donors.csv`, oldest first
pub async fn export_csv(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/export/csv");

    match state.export_service.export_csv().await {
        Ok(export) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (header::CONTENT_DISPOSITION, attachment(&export.filename)),
            ],
            export.content,
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// The printable camp report as a PDF
pub async fn export_camp_details(
    State(state): State<AppState>,
    Json(camp): Json<CampInfo>,
) -> impl IntoResponse {
    info!("POST /api/export/camp-details - camp: '{}'", camp.name);

    match state.export_service.export_camp_details(camp).await {
        Ok(export) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (header::CONTENT_DISPOSITION, attachment(&export.filename)),
            ],
            export.bytes,
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
