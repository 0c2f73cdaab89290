//! # REST API for Donor Registration
//!
//! Endpoints for registering, listing and clearing donors, plus the live
//! phone number check the add-donor form runs while typing.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;
use shared::{CreateDonorRequest, PhoneValidationRequest};

use crate::backend::domain::validation::validate_phone_number;
use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::mappers::DonorMapper;
use crate::backend::AppState;

/// List all donors, newest first
pub async fn list_donors(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/donors");

    match state.donor_service.list_donors().await {
        Ok(donors) => (StatusCode::OK, Json(DonorMapper::to_list_response(donors))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Register a new donor
pub async fn create_donor(
    State(state): State<AppState>,
    Json(request): Json<CreateDonorRequest>,
) -> impl IntoResponse {
    info!("POST /api/donors - name: '{}'", request.name);

    match state.donor_service.add_donor(request).await {
        Ok(result) => {
            (StatusCode::CREATED, Json(DonorMapper::to_create_response(result))).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Delete every donor
pub async fn clear_donors(State(state): State<AppState>) -> impl IntoResponse {
    info!("DELETE /api/donors");

    match state.donor_service.clear_donors().await {
        Ok(result) => (StatusCode::OK, Json(DonorMapper::to_clear_response(result))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Check a phone number without registering anything
pub async fn validate_phone(Json(request): Json<PhoneValidationRequest>) -> impl IntoResponse {
    info!("POST /api/donors/validate-phone");

    let result = validate_phone_number(&request.phone_number);
    (StatusCode::OK, Json(DonorMapper::to_phone_validation_response(result)))
}
