//! # Backend Module
//!
//! Contains all non-UI logic for the donor camp registry.
//!
//! - **Domain**: validation, aggregation, duplicate detection and export rules
//! - **Storage**: the donor store and its change feed
//! - **IO**: the HTTP interface a dashboard or big-screen display talks to
//!
//! ## Architecture
//!
//! ```text
//! View layer (browser dashboard, big-screen display)
//!     ↓
//! IO Layer (REST API, SSE change feed)
//!     ↓
//! Domain Layer (DonorService, ExportService, DashboardRefresher)
//!     ↓
//! Storage Layer (DonorStorage → SQLite, ChangeFeed)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use log::info;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::backend::config::Config;
use crate::backend::domain::{DashboardHandle, DashboardRefresher, DonorService, ExportService};
use crate::backend::storage::{ChangeFeed, DbConnection, DonorRepository, DonorStorage};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub donor_service: DonorService,
    pub export_service: ExportService,
    pub dashboard: DashboardHandle,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db_conn = DbConnection::new(&config.database_url).await?;

    build_state(db_conn, config.feed_capacity).await
}

/// Wire services on top of an already-open database.
pub async fn build_state(db_conn: DbConnection, feed_capacity: usize) -> Result<AppState> {
    info!("Setting up donor store");
    let feed = ChangeFeed::new(feed_capacity);
    let storage: Arc<dyn DonorStorage> = Arc::new(DonorRepository::new(db_conn, feed));

    info!("Setting up domain model");
    let donor_service = DonorService::new(storage);
    let export_service = ExportService::new(donor_service.clone());
    let dashboard = DashboardRefresher::spawn(donor_service.clone()).await?;

    Ok(AppState {
        donor_service,
        export_service,
        dashboard,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &Config) -> Result<Router> {
    let origin = config
        .allowed_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid allowed origin: {}", config.allowed_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/donors",
            get(io::list_donors)
                .post(io::create_donor)
                .delete(io::clear_donors),
        )
        .route("/donors/validate-phone", post(io::validate_phone))
        .route("/donors/events", get(io::donor_events))
        .route("/stats", get(io::get_stats))
        .route("/dashboard", get(io::get_dashboard))
        .route("/export/csv", get(io::export_csv))
        .route("/export/camp-details", post(io::export_camp_details));

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}
