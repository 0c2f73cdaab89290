//! # REST API for Dashboard Data

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;

use crate::backend::io::rest::error::ApiError;
use crate::backend::AppState;

/// Counts recomputed from the store on every call
pub async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/stats");

    match state.donor_service.stats().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// The latest snapshot kept by the dashboard refresher
pub async fn get_dashboard(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/dashboard");

    (StatusCode::OK, Json(state.dashboard.snapshot()))
}
